use axum::{http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};

/// Creation bodies accept a single object or an array of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// `201 {"message": "2 airline(s) created successfully"}`
pub fn created(count: usize, noun: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({ "message": format!("{count} {noun}(s) created successfully") })),
    )
}

pub fn message(text: &str) -> Json<Value> {
    Json(json!({ "message": text }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        name: String,
    }

    #[test]
    fn test_accepts_object_or_array() {
        let one: OneOrMany<Item> = serde_json::from_str(r#"{"name": "a"}"#).unwrap();
        assert_eq!(one.into_vec(), vec![Item { name: "a".into() }]);

        let many: OneOrMany<Item> = serde_json::from_str(r#"[{"name": "a"}, {"name": "b"}]"#).unwrap();
        assert_eq!(many.into_vec().len(), 2);

        assert!(serde_json::from_str::<OneOrMany<Item>>(r#"{"nom": "a"}"#).is_err());
    }
}
