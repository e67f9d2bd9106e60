//! Mapping from HubSpot contact records to `IntegrationItem`s.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::integration_item::IntegrationItem;

const UNNAMED_CONTACT: &str = "Unnamed Contact";

/// A contact as returned by `GET /crm/v3/objects/contacts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub properties: ContactProperties,
}

/// The default property set HubSpot returns for contacts. HubSpot sends
/// `null` for unset properties.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactProperties {
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub createdate: Option<String>,
    #[serde(default)]
    pub lastmodifieddate: Option<String>,
}

/// Map one contact. `app_base_url` is the root for the contact's link.
pub fn to_integration_item(record: &ContactRecord, app_base_url: &str) -> IntegrationItem {
    let props = &record.properties;
    let full_name = format!(
        "{} {}",
        props.firstname.as_deref().unwrap_or_default(),
        props.lastname.as_deref().unwrap_or_default()
    );
    let name = match full_name.trim() {
        "" => UNNAMED_CONTACT.to_string(),
        trimmed => trimmed.to_string(),
    };

    IntegrationItem {
        id: record.id.clone(),
        name,
        creation_time: props.createdate.as_deref().and_then(parse_timestamp),
        last_modified_time: props.lastmodifieddate.as_deref().and_then(parse_timestamp),
        url: record.id.as_deref().map(|id| {
            format!("{}/contacts/{}", app_base_url.trim_end_matches('/'), id)
        }),
        visibility: true,
    }
}

/// Map a page, preserving vendor order.
pub fn to_integration_items(records: &[ContactRecord], app_base_url: &str) -> Vec<IntegrationItem> {
    records
        .iter()
        .map(|r| to_integration_item(r, app_base_url))
        .collect()
}

/// RFC 3339 timestamp → UTC. Anything unparseable is absent.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(value = raw, error = %e, "ignoring unparseable contact timestamp");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    const APP: &str = "https://app.hubspot.com";

    fn record(value: serde_json::Value) -> ContactRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_record_maps_every_field() {
        let item = to_integration_item(
            &record(json!({
                "id": "5",
                "properties": {
                    "firstname": "Ada",
                    "lastname": "Lovelace",
                    "createdate": "2024-03-01T10:15:30.123Z",
                    "lastmodifieddate": "2024-03-02T08:00:00+02:00"
                }
            })),
            APP,
        );

        assert_eq!(item.id.as_deref(), Some("5"));
        assert_eq!(item.name, "Ada Lovelace");
        assert_eq!(
            item.creation_time,
            Some(
                Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap()
                    + chrono::Duration::milliseconds(123)
            )
        );
        assert_eq!(
            item.last_modified_time,
            Some(Utc.with_ymd_and_hms(2024, 3, 2, 6, 0, 0).unwrap())
        );
        assert_eq!(item.url.as_deref(), Some("https://app.hubspot.com/contacts/5"));
        assert!(item.visibility);
    }

    #[test]
    fn test_name_is_trimmed_when_one_part_missing() {
        let item = to_integration_item(
            &record(json!({"id": "1", "properties": {"firstname": "Grace", "lastname": null}})),
            APP,
        );
        assert_eq!(item.name, "Grace");

        let item = to_integration_item(
            &record(json!({"id": "2", "properties": {"lastname": "Hopper"}})),
            APP,
        );
        assert_eq!(item.name, "Hopper");
    }

    #[test]
    fn test_nameless_contact_gets_placeholder() {
        let item = to_integration_item(
            &record(json!({"id": "3", "properties": {"firstname": "  ", "lastname": ""}})),
            APP,
        );
        assert_eq!(item.name, "Unnamed Contact");

        let item = to_integration_item(&record(json!({"id": "4"})), APP);
        assert_eq!(item.name, "Unnamed Contact");
    }

    #[test]
    fn test_bad_timestamps_are_absent() {
        let item = to_integration_item(
            &record(json!({
                "id": "6",
                "properties": {"createdate": "yesterday", "lastmodifieddate": "2024-13-45T00:00:00Z"}
            })),
            APP,
        );
        assert_eq!(item.creation_time, None);
        assert_eq!(item.last_modified_time, None);
    }

    #[test]
    fn test_missing_id_has_no_url() {
        let item = to_integration_item(&record(json!({"properties": {"firstname": "X"}})), APP);
        assert_eq!(item.id, None);
        assert_eq!(item.url, None);
    }

    #[test]
    fn test_page_order_is_preserved() {
        let records = vec![
            record(json!({"id": "b"})),
            record(json!({"id": "a"})),
            record(json!({"id": "c"})),
        ];
        let ids: Vec<_> = to_integration_items(&records, "https://app.hubspot.com/")
            .into_iter()
            .map(|i| i.id.unwrap())
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }
}
