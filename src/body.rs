//! Request body construction from `request.postData`.

use crate::error::HarError;
use crate::har::{PostData, PostParam};
use crate::headers::to_transport_headers;
use thiserror::Error;
use tracing::{debug, warn};

/// One attribute of a multipart field, in the order it was declared.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldAttribute {
    Name(String),
    Contents(String),
    File(String),
    FileName(String),
    ContentType(String),
    Headers(Vec<String>),
}

/// A single `multipart/form-data` part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormField {
    pub attributes: Vec<FieldAttribute>,
}

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("field has no name")]
    MissingName,

    #[error("field {0:?} carries both inline contents and a file")]
    ContentsAndFile(String),

    #[error("field {name:?}: {source}")]
    Header {
        name: String,
        #[source]
        source: HarError,
    },
}

/// What the transport should send as the request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Raw(Vec<u8>),
    Multipart(Vec<FormField>),
}

impl FormField {
    /// Collect whatever attributes the param carries, in fixed order.
    pub fn from_param(param: &PostParam) -> Result<Self, FieldError> {
        let mut attributes = Vec::new();

        if let Some(name) = &param.name {
            attributes.push(FieldAttribute::Name(name.clone()));
        }
        if let Some(value) = &param.value {
            attributes.push(FieldAttribute::Contents(value.clone()));
        }
        if let Some(file) = &param.file {
            attributes.push(FieldAttribute::File(file.clone()));
        }
        if let Some(file_name) = &param.file_name {
            attributes.push(FieldAttribute::FileName(file_name.clone()));
        }
        if let Some(content_type) = &param.content_type {
            attributes.push(FieldAttribute::ContentType(content_type.clone()));
        }
        if let Some(headers) = &param.headers {
            let lines = to_transport_headers(headers).map_err(|source| FieldError::Header {
                name: param.name.clone().unwrap_or_default(),
                source,
            })?;
            attributes.push(FieldAttribute::Headers(lines));
        }

        let field = Self { attributes };
        field.validate()?;
        Ok(field)
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.iter().find_map(|a| match a {
            FieldAttribute::Name(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        let name = self.name().ok_or(FieldError::MissingName)?;

        let has_contents = self
            .attributes
            .iter()
            .any(|a| matches!(a, FieldAttribute::Contents(_)));
        let has_file = self
            .attributes
            .iter()
            .any(|a| matches!(a, FieldAttribute::File(_)));
        if has_contents && has_file {
            return Err(FieldError::ContentsAndFile(name.to_string()));
        }

        Ok(())
    }
}

/// Build the request body.
///
/// Structured params become a multipart body; a field that cannot be built
/// is logged and left out while the remaining fields are still added.
/// Raw text is sent verbatim, or base64-decoded when `encoding` says so.
pub fn build_body(post_data: Option<&PostData>) -> Result<RequestBody, HarError> {
    let Some(post_data) = post_data else {
        return Ok(RequestBody::Empty);
    };

    if let Some(params) = post_data.non_empty_params() {
        if post_data.text.is_some() {
            return Err(HarError::TextAndParamsConflict);
        }

        let mut fields = Vec::with_capacity(params.len());
        for (index, param) in params.iter().enumerate() {
            match FormField::from_param(param) {
                Ok(field) => fields.push(field),
                Err(err) => warn!("Skipping postData.params[{}]: {}", index, err),
            }
        }

        if fields.is_empty() {
            warn!("No usable postData.params, sending no body");
            return Ok(RequestBody::Empty);
        }

        debug!("request.postData.params: {} field(s)", fields.len());
        return Ok(RequestBody::Multipart(fields));
    }

    let Some(text) = &post_data.text else {
        return Ok(RequestBody::Empty);
    };

    let bytes = match post_data.decoded_text() {
        Some(bytes) => bytes,
        None => {
            warn!("request.postData.text is not valid base64, sending it verbatim");
            text.as_bytes().to_vec()
        }
    };

    if bytes.is_empty() {
        return Ok(RequestBody::Empty);
    }

    debug!("request.postData.text: {} byte(s)", bytes.len());
    Ok(RequestBody::Raw(bytes))
}
