//! Newsletter subscribers
//!
//! The row model, its status and type codes, and the collection that
//! composes subscriber queries.

pub mod collection;


pub use collection::SubscriberCollection;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the subscriber table, plus the columns optional joins project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscriber {
    pub subscriber_id: i32,
    pub store_id: i32,
    pub customer_id: i32,
    pub subscriber_email: Option<String>,
    pub subscriber_status: i32,
    pub change_status_at: Option<DateTime<Utc>>,
    pub subscriber_confirm_code: Option<String>,

    #[sqlx(default)]
    pub customer_firstname: Option<String>,
    #[sqlx(default)]
    pub customer_lastname: Option<String>,
    #[sqlx(default, rename = "type")]
    #[serde(rename = "type")]
    pub subscriber_type: Option<i32>,
    #[sqlx(default)]
    pub group_id: Option<i32>,
    #[sqlx(default)]
    pub website_id: Option<i32>,
}

impl Subscriber {
    pub fn status(&self) -> Option<SubscriberStatus> {
        SubscriberStatus::try_from(self.subscriber_status).ok()
    }

    /// Projected `type` column if loaded, otherwise derived from `customer_id`
    pub fn kind(&self) -> SubscriberType {
        self.subscriber_type
            .and_then(|code| SubscriberType::try_from(code).ok())
            .unwrap_or_else(|| SubscriberType::for_customer_id(self.customer_id))
    }

    pub fn is_subscribed(&self) -> bool {
        self.status() == Some(SubscriberStatus::Subscribed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriberStatus {
    Subscribed = 1,
    NotActive = 2,
    Unsubscribed = 3,
    Unconfirmed = 4,
}

impl SubscriberStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for SubscriberStatus {
    type Error = i32;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(SubscriberStatus::Subscribed),
            2 => Ok(SubscriberStatus::NotActive),
            3 => Ok(SubscriberStatus::Unsubscribed),
            4 => Ok(SubscriberStatus::Unconfirmed),
            other => Err(other),
        }
    }
}

/// Guest subscribers have no customer account (`customer_id = 0`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriberType {
    Guest = 1,
    Customer = 2,
}

impl SubscriberType {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn for_customer_id(customer_id: i32) -> Self {
        if customer_id == 0 {
            SubscriberType::Guest
        } else {
            SubscriberType::Customer
        }
    }
}

impl TryFrom<i32> for SubscriberType {
    type Error = i32;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(SubscriberType::Guest),
            2 => Ok(SubscriberType::Customer),
            other => Err(other),
        }
    }
}

/// Newsletter send batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueId(pub i32);

impl From<i32> for QueueId {
    fn from(id: i32) -> Self {
        QueueId(id)
    }
}

/// One or more store ids for `add_store_filter`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreIds(pub Vec<i32>);

impl StoreIds {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<i32> for StoreIds {
    fn from(id: i32) -> Self {
        StoreIds(vec![id])
    }
}

impl From<Vec<i32>> for StoreIds {
    fn from(ids: Vec<i32>) -> Self {
        StoreIds(ids)
    }
}

impl From<&[i32]> for StoreIds {
    fn from(ids: &[i32]) -> Self {
        StoreIds(ids.to_vec())
    }
}

impl<const N: usize> From<[i32; N]> for StoreIds {
    fn from(ids: [i32; N]) -> Self {
        StoreIds(ids.to_vec())
    }
}
