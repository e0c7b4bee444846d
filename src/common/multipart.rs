// src/common/multipart.rs

use axum::extract::Multipart;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::common::{error::AppError, storage::UploadedFile};

// Como o payload chega junto com as imagens num único multipart, os campos
// de texto são acumulados num objeto JSON e desserializados no DTO alvo.
pub struct FormOptions<'a> {
    // Nomes de parte que carregam arquivo (ex.: "image", "images").
    pub file_fields: &'a [&'a str],
    // Campos que devem virar lista mesmo com uma única ocorrência (ex.: "roles").
    pub list_fields: &'a [&'a str],
    pub max_files: usize,
}

pub async fn parse_form<T: DeserializeOwned>(
    mut multipart: Multipart,
    options: FormOptions<'_>,
) -> Result<(T, Vec<UploadedFile>), AppError> {
    let mut fields: Map<String, Value> = Map::new();
    let mut files: Vec<UploadedFile> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if options.file_fields.contains(&name.as_str()) {
            if files.len() >= options.max_files {
                return Err(AppError::bad_request("Quantidade de arquivos excedida."));
            }

            let file_name = field.file_name().unwrap_or("arquivo").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await?;

            // Parte de arquivo vazia (input sem seleção) é ignorada.
            if bytes.is_empty() {
                continue;
            }

            files.push(UploadedFile {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let text = field.text().await?;
            push_field(&mut fields, &name, text, options.list_fields);
        }
    }

    let payload = serde_json::from_value(Value::Object(fields))
        .map_err(|e| AppError::bad_request(format!("Payload inválido: {}", e)))?;

    Ok((payload, files))
}

// Campos repetidos viram lista; campos declarados em `list_fields` são lista
// desde a primeira ocorrência.
fn push_field(fields: &mut Map<String, Value>, name: &str, text: String, list_fields: &[&str]) {
    match fields.get_mut(name) {
        Some(Value::Array(items)) => items.push(Value::String(text)),
        Some(existing) => {
            let previous = existing.take();
            *existing = Value::Array(vec![previous, Value::String(text)]);
        }
        None if list_fields.contains(&name) => {
            fields.insert(name.to_string(), Value::Array(vec![Value::String(text)]));
        }
        None => {
            fields.insert(name.to_string(), Value::String(text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_fields_stay_scalar() {
        let mut fields = Map::new();
        push_field(&mut fields, "email", "a@b.com".into(), &["roles"]);
        assert_eq!(Value::Object(fields), json!({ "email": "a@b.com" }));
    }

    #[test]
    fn declared_list_field_is_array_from_first_occurrence() {
        let mut fields = Map::new();
        push_field(&mut fields, "roles", "CUSTOMER".into(), &["roles"]);
        assert_eq!(Value::Object(fields), json!({ "roles": ["CUSTOMER"] }));
    }

    #[test]
    fn repeated_field_becomes_array() {
        let mut fields = Map::new();
        push_field(&mut fields, "roles", "CUSTOMER".into(), &[]);
        push_field(&mut fields, "roles", "PROFESSIONAL".into(), &[]);
        assert_eq!(
            Value::Object(fields),
            json!({ "roles": ["CUSTOMER", "PROFESSIONAL"] })
        );
    }

    #[test]
    fn third_occurrence_appends_to_existing_array() {
        let mut fields = Map::new();
        for value in ["a", "b", "c"] {
            push_field(&mut fields, "tags", value.into(), &[]);
        }
        assert_eq!(Value::Object(fields), json!({ "tags": ["a", "b", "c"] }));
    }
}
