// Decoding of raw catalog documents into typed items
use serde::Deserialize;
use serde_json::Value;
use simrec_core::{Error, Item, Result};
use tracing::warn;

/// A record id as exported by the product store: a plain string, a number,
/// or Mongo extended JSON `{"$oid": "..."}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordId {
    Text(String),
    Number(u64),
    ObjectId {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl RecordId {
    fn into_string(self) -> String {
        match self {
            RecordId::Text(s) => s,
            RecordId::Number(n) => n.to_string(),
            RecordId::ObjectId { oid } => oid,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(alias = "_id")]
    id: Option<RecordId>,
    name: Option<String>,
    description: Option<String>,
    category: Option<String>,
    #[serde(rename = "subCategory", alias = "sub_category")]
    sub_category: Option<String>,
}

/// Either a bare array of records or the product list response
/// `{"success": true, "products": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<Value>),
    Wrapped { products: Vec<Value> },
}

fn required(field: Option<String>, name: &str, id: &str) -> Result<String> {
    field.ok_or_else(|| Error::InvalidRecord(format!("record '{id}' is missing '{name}'")))
}

/// Validate one raw record.
pub fn decode_record(value: Value) -> Result<Item> {
    let raw: RawRecord = serde_json::from_value(value)?;

    let id = raw
        .id
        .map(RecordId::into_string)
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| Error::InvalidRecord("record has no id".to_string()))?;

    Ok(Item {
        name: required(raw.name, "name", &id)?,
        category: required(raw.category, "category", &id)?,
        sub_category: required(raw.sub_category, "subCategory", &id)?,
        description: raw.description,
        id,
    })
}

/// Decode a whole catalog document. Invalid records are skipped with a
/// warning; a document that is not a catalog at all is an error.
pub fn decode_catalog(bytes: &[u8]) -> Result<Vec<Item>> {
    let records = match serde_json::from_slice::<CatalogDocument>(bytes)? {
        CatalogDocument::List(records) => records,
        CatalogDocument::Wrapped { products } => products,
    };

    let total = records.len();
    let items: Vec<Item> = records
        .into_iter()
        .enumerate()
        .filter_map(|(position, value)| match decode_record(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(position, "skipping catalog record: {}", e);
                None
            }
        })
        .collect();

    if items.len() < total {
        warn!(skipped = total - items.len(), total, "catalog contained invalid records");
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_bare_array() {
        let doc = json!([
            {"_id": "a1", "name": "Tee", "description": "cotton", "category": "Men", "subCategory": "Topwear"},
            {"id": "b2", "name": "Jeans", "category": "Men", "sub_category": "Bottomwear"}
        ]);
        let items = decode_catalog(doc.to_string().as_bytes()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "a1");
        assert_eq!(items[0].description.as_deref(), Some("cotton"));
        assert_eq!(items[1].sub_category, "Bottomwear");
        assert!(items[1].description.is_none());
    }

    #[test]
    fn test_decode_wrapped_products() {
        let doc = json!({
            "success": true,
            "products": [
                {"_id": {"$oid": "65f0c2"}, "name": "Jacket", "description": null, "category": "Women", "subCategory": "Winterwear"}
            ]
        });
        let items = decode_catalog(doc.to_string().as_bytes()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "65f0c2");
        assert!(items[0].description.is_none());
    }

    #[test]
    fn test_invalid_records_are_skipped() {
        let doc = json!([
            {"name": "no id", "category": "c", "subCategory": "s"},
            {"_id": "  ", "name": "blank id", "category": "c", "subCategory": "s"},
            {"_id": "x", "category": "c", "subCategory": "s"},
            {"_id": 42, "name": "ok", "category": "c", "subCategory": "s"}
        ]);
        let items = decode_catalog(doc.to_string().as_bytes()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "42");
    }

    #[test]
    fn test_not_a_catalog() {
        assert!(matches!(
            decode_catalog(br#"{"success": false, "message": "boom"}"#),
            Err(Error::Serialization(_))
        ));
        assert!(decode_catalog(b"not json").is_err());
    }

    #[test]
    fn test_empty_catalog() {
        assert!(decode_catalog(b"[]").unwrap().is_empty());
        assert!(decode_catalog(br#"{"products": []}"#).unwrap().is_empty());
    }
}
