use super::types::NewsletterSubscription;
use super::ServiceError;
use crate::db::{Insert, MemoryStore, Record, StoreError};
use crate::schema::{validate_into, ValidationErrors};
use anyhow::Context;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Service for validated record operations
pub struct SiteService {
    store: Arc<MemoryStore>,
}

impl SiteService {
    /// Create a new site service
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Validate raw input and store it as a new record
    pub fn create<I: Insert>(&self, input: &Value) -> Result<I::Record, ServiceError> {
        let kind = <I::Record as Record>::KIND;
        let insert = validate_into::<I>(input).inspect_err(|e| {
            if let ServiceError::Validation(errors) = e {
                debug!(%kind, fields = ?errors.fields(), "Rejected invalid input");
            }
        })?;

        match self.store.create(insert) {
            Ok(record) => {
                info!(%kind, id = record.id(), "Created record");
                Ok(record)
            },
            Err(err @ StoreError::Duplicate { .. }) => {
                info!(%kind, "Rejected duplicate record");
                Err(err.into())
            },
            Err(err) => Err(err.into()),
        }
    }

    /// List every record of a kind
    pub fn list<R: Record>(&self) -> Result<Vec<R>, ServiceError> {
        Ok(self.store.list::<R>()?)
    }

    /// Get a record by ID
    pub fn get<R: Record>(&self, id: &str) -> Result<R, ServiceError> {
        self.store.get::<R>(id)?.ok_or_else(|| not_found::<R>(id))
    }

    /// Apply a partial update.
    ///
    /// `patch` is merged over the current record's fields and the result is
    /// validated against the full insert schema. The merge reads the record
    /// inside the store's write guard, so concurrent patches to different
    /// fields all land. Identity and server timestamps never change.
    pub fn update<I: Insert>(&self, id: &str, patch: &Value) -> Result<I::Record, ServiceError> {
        let Some(patch) = patch.as_object() else {
            return Err(ServiceError::Validation(ValidationErrors::not_an_object()));
        };

        let updated = self
            .store
            .patch::<I, ServiceError>(id, |existing| {
                let mut merged = match serde_json::to_value(existing)
                    .context("Failed to serialize existing record")?
                {
                    Value::Object(fields) => fields,
                    _ => {
                        return Err(anyhow::anyhow!("Record did not serialize to an object").into())
                    },
                };
                for (key, value) in patch {
                    merged.insert(key.clone(), value.clone());
                }
                validate_into::<I>(&Value::Object(merged))
            })?
            .ok_or_else(|| not_found::<I::Record>(id))?;

        info!(kind = %<I::Record as Record>::KIND, id, "Updated record");
        Ok(updated)
    }

    /// Remove a record
    pub fn delete<R: Record>(&self, id: &str) -> Result<(), ServiceError> {
        if self.store.delete::<R>(id)? {
            info!(kind = %R::KIND, id, "Deleted record");
            Ok(())
        } else {
            Err(not_found::<R>(id))
        }
    }

    /// Find a newsletter subscription by email
    pub fn subscription_by_email(
        &self,
        email: &str,
    ) -> Result<Option<NewsletterSubscription>, ServiceError> {
        Ok(self.store.subscription_by_email(email)?)
    }
}

fn not_found<R: Record>(id: &str) -> ServiceError {
    ServiceError::NotFound(format!("{} '{}' not found", R::KIND.label(), id))
}
