//! libcurl transport, through the curl crate's easy interface.

use super::{Method, RequestPlan, TransferTimes, Transport, TransportFailure, TransportOutcome};
use crate::body::{FieldAttribute, FormField, RequestBody};
use crate::capture::{CaptureSink, DebugKind};
use anyhow::{Context, Result};
use curl::easy::{Easy, Form, InfoType, List};
use std::cell::RefCell;
use std::io::Read;
use std::time::Duration;
use tracing::{debug, warn};

/// Runs each request on a fresh curl easy handle.
#[derive(Debug, Default)]
pub struct CurlTransport {
    timeout: Option<Duration>,
}

impl CurlTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn perform(&self, easy: &mut Easy, plan: &RequestPlan, sink: &mut CaptureSink) -> Result<(), curl::Error> {
        easy.url(&plan.url)?;
        // The debug callback only fires in verbose mode.
        easy.verbose(true)?;
        if let Some(timeout) = self.timeout {
            easy.timeout(timeout)?;
        }

        match &plan.method {
            Method::Get => easy.get(true)?,
            Method::Post => easy.post(true)?,
            Method::Put => easy.upload(true)?,
            Method::Head => easy.nobody(true)?,
            Method::Custom(method) => easy.custom_request(method)?,
        }

        if !plan.headers.is_empty() {
            let mut list = List::new();
            for header in &plan.headers {
                list.append(header)?;
            }
            easy.http_headers(list)?;
        }

        // PUT is an upload: its body goes through the read callback.
        let mut upload: &[u8] = &[];
        match &plan.body {
            RequestBody::Empty => {}
            RequestBody::Multipart(fields) => easy.httppost(build_form(fields))?,
            RequestBody::Raw(bytes) if plan.method == Method::Put => upload = bytes.as_slice(),
            RequestBody::Raw(bytes) => easy.post_fields_copy(bytes)?,
        }
        if plan.method == Method::Put {
            easy.in_filesize(upload.len() as u64)?;
        }

        let sink = RefCell::new(sink);
        let mut transfer = easy.transfer();
        transfer.debug_function(|kind, data| {
            sink.borrow_mut().on_debug(debug_kind(kind), data);
        })?;
        transfer.header_function(|data| {
            sink.borrow_mut().on_header(data);
            true
        })?;
        transfer.write_function(|data| Ok(sink.borrow_mut().on_write(data)))?;
        if plan.method == Method::Put {
            transfer.read_function(move |buf| Ok(upload.read(buf).unwrap_or(0)))?;
        }

        transfer.perform()
    }
}

impl Transport for CurlTransport {
    fn execute(&mut self, plan: &RequestPlan, sink: &mut CaptureSink) -> TransportOutcome {
        debug!("{} {}", plan.method.as_str(), plan.url);

        let mut easy = Easy::new();
        let error = self.perform(&mut easy, plan, sink).err().map(|err| {
            warn!("Transfer failed: {}", err);
            TransportFailure {
                code: err.code() as i32,
                message: err.to_string(),
            }
        });

        TransportOutcome {
            status: easy.response_code().unwrap_or(0),
            effective_url: easy.effective_url().ok().flatten().map(str::to_owned),
            times: transfer_times(&mut easy).ok(),
            error,
        }
    }
}

fn transfer_times(easy: &mut Easy) -> Result<TransferTimes, curl::Error> {
    Ok(TransferTimes {
        name_lookup: easy.namelookup_time()?,
        connect: easy.connect_time()?,
        app_connect: easy.appconnect_time()?,
        pre_transfer: easy.pretransfer_time()?,
        start_transfer: easy.starttransfer_time()?,
        total: easy.total_time()?,
    })
}

fn debug_kind(kind: InfoType) -> DebugKind {
    match kind {
        InfoType::Text => DebugKind::Text,
        InfoType::HeaderIn => DebugKind::HeaderIn,
        InfoType::HeaderOut => DebugKind::HeaderOut,
        InfoType::DataIn => DebugKind::DataIn,
        InfoType::DataOut => DebugKind::DataOut,
        _ => DebugKind::Other,
    }
}

/// Assemble a curl form. Parts curl rejects are logged and left out.
fn build_form(fields: &[FormField]) -> Form {
    let mut form = Form::new();

    for field in fields {
        if let Err(err) = add_part(&mut form, field) {
            warn!("Skipping multipart field {:?}: {:#}", field.name().unwrap_or_default(), err);
        }
    }

    form
}

fn add_part(form: &mut Form, field: &FormField) -> Result<()> {
    let name = field.name().context("field has no name")?;
    let mut part = form.part(name);

    for attribute in &field.attributes {
        match attribute {
            FieldAttribute::Name(_) => {}
            FieldAttribute::Contents(value) => {
                part.contents(value.as_bytes());
            }
            FieldAttribute::File(path) => {
                part.file(path.as_str());
            }
            FieldAttribute::FileName(file_name) => {
                part.filename(file_name.as_str());
            }
            FieldAttribute::ContentType(content_type) => {
                part.content_type(content_type);
            }
            FieldAttribute::Headers(lines) => {
                let mut list = List::new();
                for line in lines {
                    list.append(line)?;
                }
                part.content_header(list);
            }
        }
    }

    part.add().context("curl refused the part")?;
    Ok(())
}
