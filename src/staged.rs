//! Lists edited as a draft and saved explicitly.
//!
//! Nested collections such as the tenants of a property are edited in
//! place but only sent to the backend on save. Until then the saved list is
//! kept untouched so that a discard can restore it.

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::api::{ApiError, PageGateway};

/// A saved list with its pending draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedList<T> {
    saved: Vec<T>,
    draft: Vec<T>,
}

impl<T: Clone + PartialEq> StagedList<T> {
    /// Starts a draft from the list as last saved.
    #[must_use]
    pub fn new(saved: Vec<T>) -> Self {
        Self {
            draft: saved.clone(),
            saved,
        }
    }

    /// The list as last saved.
    #[must_use]
    pub fn saved(&self) -> &[T] {
        &self.saved
    }

    /// The list being edited.
    #[must_use]
    pub fn draft(&self) -> &[T] {
        &self.draft
    }

    /// True when the draft differs from the saved list.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.draft != self.saved
    }

    /// Appends `item` to the draft.
    pub fn add(&mut self, item: T) {
        self.draft.push(item);
    }

    /// Replaces the draft item at `index`, returning the previous one.
    ///
    /// Returns `None` and leaves the draft unchanged when `index` is out of
    /// range.
    pub fn update(&mut self, index: usize, item: T) -> Option<T> {
        self.draft
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, item))
    }

    /// Removes the draft item at `index`.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.draft.len()).then(|| self.draft.remove(index))
    }

    /// Throws the draft away and restores the saved list.
    pub fn discard(&mut self) {
        self.draft.clone_from(&self.saved);
    }
}

impl<T> StagedList<T>
where
    T: Clone + PartialEq + Serialize + DeserializeOwned,
{
    /// Sends the draft as `{field: [...]}` to `endpoint` with a PATCH.
    ///
    /// The updated record's `field` becomes the new saved list, so ids
    /// assigned by the backend are picked up. A clean draft sends nothing.
    /// Returns whether a request was made.
    ///
    /// # Errors
    ///
    /// Returns the gateway error, or [`ApiError::Decode`] when the draft
    /// cannot be serialised or the response list cannot be decoded. The
    /// draft is kept in both cases so the user can retry.
    pub async fn save(
        &mut self,
        gateway: &dyn PageGateway,
        endpoint: &str,
        field: &str,
    ) -> Result<bool, ApiError> {
        if !self.is_dirty() {
            return Ok(false);
        }

        let items = serde_json::to_value(&self.draft).map_err(|error| ApiError::Decode {
            message: format!("{field}: {error}"),
        })?;
        let mut body = Map::new();
        body.insert(field.to_owned(), items);

        let record = gateway.patch(endpoint, &Value::Object(body)).await?;
        let reconciled = record.get(field).map_or_else(
            || Ok(self.draft.clone()),
            |list| {
                Vec::<T>::deserialize(list).map_err(|error| ApiError::Decode {
                    message: format!("{field}: {error}"),
                })
            },
        )?;

        tracing::debug!(endpoint, field, items = reconciled.len(), "saved staged list");
        self.saved.clone_from(&reconciled);
        self.draft = reconciled;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::StagedList;
    use crate::api::{ApiError, MockPageGateway, Tenant};

    fn tenant(name: &str) -> Tenant {
        Tenant {
            name: name.to_owned(),
            ..Tenant::default()
        }
    }

    #[fixture]
    fn tenants() -> StagedList<Tenant> {
        StagedList::new(vec![Tenant {
            id: Some(1),
            ..tenant("Ana")
        }])
    }

    #[rstest]
    fn edits_stay_in_the_draft(mut tenants: StagedList<Tenant>) {
        tenants.add(tenant("Ben"));
        let previous = tenants.update(0, tenant("Ana Lee"));

        assert_eq!(previous.map(|old| old.name), Some("Ana".to_owned()));
        assert!(tenants.is_dirty());
        assert_eq!(tenants.saved().len(), 1);
        assert_eq!(
            tenants.saved().first().map(|saved| saved.name.as_str()),
            Some("Ana")
        );
        assert_eq!(tenants.draft().len(), 2);
    }

    #[rstest]
    fn out_of_range_edits_are_ignored(mut tenants: StagedList<Tenant>) {
        assert_eq!(tenants.update(5, tenant("Zed")), None);
        assert_eq!(tenants.remove(5), None);
        assert!(!tenants.is_dirty());
    }

    #[rstest]
    fn discard_restores_saved_list(mut tenants: StagedList<Tenant>) {
        tenants.remove(0);
        tenants.add(tenant("Cy"));

        tenants.discard();

        assert!(!tenants.is_dirty());
        assert_eq!(tenants.draft(), tenants.saved());
    }

    #[rstest]
    #[tokio::test]
    async fn clean_draft_sends_nothing(mut tenants: StagedList<Tenant>) {
        let gateway = MockPageGateway::new();

        let sent = tenants
            .save(&gateway, "properties/3/", "tenants")
            .await
            .expect("nothing to save");

        assert!(!sent);
    }

    #[rstest]
    #[tokio::test]
    async fn save_adopts_server_assigned_ids(mut tenants: StagedList<Tenant>) {
        let mut gateway = MockPageGateway::new();
        gateway
            .expect_patch()
            .withf(|endpoint, body| {
                endpoint == "properties/3/"
                    && body == &json!({"tenants": [{"id": 1, "name": "Ana", "phone": null, "email": null}, {"name": "Ben", "phone": null, "email": null}]})
            })
            .times(1)
            .returning(|_, _| {
                Ok(json!({
                    "id": 3,
                    "tenants": [{"id": 1, "name": "Ana"}, {"id": 9, "name": "Ben"}],
                }))
            });
        tenants.add(tenant("Ben"));

        let sent = tenants
            .save(&gateway, "properties/3/", "tenants")
            .await
            .expect("save should succeed");

        assert!(sent);
        assert!(!tenants.is_dirty());
        assert_eq!(tenants.saved().get(1).and_then(|saved| saved.id), Some(9));
    }

    #[rstest]
    #[tokio::test]
    async fn failed_save_keeps_the_draft(mut tenants: StagedList<Tenant>) {
        let mut gateway = MockPageGateway::new();
        gateway.expect_patch().returning(|_, _| {
            Err(ApiError::Api {
                status: 400,
                message: "update failed: tenants: name is required".to_owned(),
            })
        });
        tenants.add(tenant(""));

        let result = tenants.save(&gateway, "properties/3/", "tenants").await;

        assert!(matches!(result, Err(ApiError::Api { status: 400, .. })));
        assert!(tenants.is_dirty());
        assert_eq!(tenants.draft().len(), 2);
    }
}
