pub mod binarymodel;
pub mod deliverymodel;
pub mod distributormodel;
pub mod funnelmodel;
pub mod inventorymodel;
pub mod milestonemodel;
pub mod payoutmodel;
pub mod usermodel;
pub mod walletmodels;

use serde::{Deserialize, Deserializer, Serialize};

/// Upstream ids come back as integers from some endpoints and strings from others.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    }))
}

/// Upstream list envelope: `{ count, results, total_pages, next, previous }`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Paginated<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

impl<T> Paginated<T> {
    /// Older endpoints omit `total_pages`; derive it from the count.
    pub fn total_pages(&self, page_size: u32) -> u32 {
        self.total_pages.unwrap_or_else(|| {
            let size = page_size.max(1) as u64;
            ((self.count + size - 1) / size) as u32
        })
    }

    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            count: self.count,
            results: self.results.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            next: self.next,
            previous: self.previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "deserialize_id")]
        id: String,
        #[serde(default, deserialize_with = "deserialize_optional_id")]
        parent: Option<String>,
    }

    #[test]
    fn test_ids_accept_numbers_and_strings() {
        let rows: Vec<Row> = serde_json::from_str(
            r#"[{"id": 7, "parent": "3"}, {"id": "abc"}, {"id": 1, "parent": null}]"#,
        )
        .unwrap();

        assert_eq!(rows[0].id, "7");
        assert_eq!(rows[0].parent.as_deref(), Some("3"));
        assert_eq!(rows[1].id, "abc");
        assert_eq!(rows[1].parent, None);
        assert_eq!(rows[2].parent, None);
    }

    #[test]
    fn test_total_pages_falls_back_to_count() {
        let page: Paginated<u32> =
            serde_json::from_str(r#"{"count": 21, "results": [1, 2, 3]}"#).unwrap();
        assert_eq!(page.total_pages(10), 3);

        let page: Paginated<u32> =
            serde_json::from_str(r#"{"count": 21, "results": [], "total_pages": 5}"#).unwrap();
        assert_eq!(page.total_pages(10), 5);
    }
}
