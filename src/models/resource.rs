use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of a draft/published pair a caller is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceMode {
    /// The unpublished (draft) state.
    Edit,
    /// The published state.
    View,
}

/// Both states of a resource that is edited in draft and then published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPublished<T> {
    pub unpublished: Option<T>,
    pub published: Option<T>,
}

impl<T> Default for DraftPublished<T> {
    fn default() -> Self {
        Self {
            unpublished: None,
            published: None,
        }
    }
}

impl<T> DraftPublished<T> {
    pub fn new(unpublished: Option<T>, published: Option<T>) -> Self {
        Self {
            unpublished,
            published,
        }
    }

    /// Same value on both sides, as for a freshly published resource.
    pub fn both(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            unpublished: Some(value.clone()),
            published: Some(value),
        }
    }

    pub fn select(&self, mode: ResourceMode) -> Option<&T> {
        match mode {
            ResourceMode::Edit => self.unpublished.as_ref(),
            ResourceMode::View => self.published.as_ref(),
        }
    }
}

/// Identity and audit data shared by every stored resource.
pub trait BaseDomain {
    fn id(&self) -> Option<&str>;
    fn updated_at(&self) -> Option<DateTime<Utc>>;
}

pub trait DeletableResource {
    fn deleted_at(&self) -> Option<DateTime<Utc>>;
}

macro_rules! impl_resource_traits {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::models::resource::BaseDomain for $ty {
                fn id(&self) -> Option<&str> {
                    self.id.as_deref()
                }

                fn updated_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
                    self.updated_at
                }
            }

            impl $crate::models::resource::DeletableResource for $ty {
                fn deleted_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
                    self.deleted_at
                }
            }
        )+
    };
}

pub(crate) use impl_resource_traits;
