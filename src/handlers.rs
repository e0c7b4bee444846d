pub mod auth;
pub mod evaluation;
pub mod jobs;
pub mod orders;
pub mod users;

use serde::Deserialize;
use utoipa::IntoParams;

// Paginação padrão das listagens: ?page=&size=
#[derive(Debug, Deserialize, IntoParams)]
pub struct PageQuery {
    #[serde(default = "default_page", deserialize_with = "de_page")]
    pub page: i64,
    #[serde(default = "default_size", deserialize_with = "de_size")]
    pub size: i64,
}

pub(crate) fn default_page() -> i64 {
    1
}

pub(crate) fn default_size() -> i64 {
    10
}

// Página e tamanho vêm do cliente; valores abaixo de 1 são normalizados
// ainda na desserialização para nunca virarem OFFSET/LIMIT negativos.
pub(crate) fn de_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    Ok(value.max(1))
}

pub(crate) fn de_size<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    Ok(value.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_params_use_defaults() {
        let query: PageQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.size, 10);
    }

    #[test]
    fn page_zero_is_normalized_to_first_page() {
        let query: PageQuery = serde_json::from_value(json!({ "page": 0, "size": 10 })).unwrap();
        assert_eq!(query.page, 1);
    }

    #[test]
    fn negative_page_and_size_are_normalized() {
        let query: PageQuery = serde_json::from_value(json!({ "page": -3, "size": -5 })).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.size, 1);
    }

    #[test]
    fn valid_values_pass_through() {
        let query: PageQuery = serde_json::from_value(json!({ "page": 3, "size": 25 })).unwrap();
        assert_eq!(query.page, 3);
        assert_eq!(query.size, 25);
    }
}
