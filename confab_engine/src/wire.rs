//! Record-level encoding of dialogs onto the node contract.
//!
//! Record structure (integer widths set by the node contract):
//! - Dialog: `{id: u16, title: str, entry: u16, repeated Page}`
//! - Page: `{id: u16, text: str, repeated Response}`
//! - Response: `{target: u16 (Id::END = end sentinel), text: str,
//!   repeated extension str}` — extension strings are opaque and pass
//!   through unchanged for forward compatibility.

#![allow(clippy::cast_possible_truncation)]

use confab_data::{Dialog, Id, Page, Response, Target};

use crate::codec::{NodeReader, NodeWriter, WireError};

pub(crate) fn node_len(len: usize) -> Result<u32, WireError> {
    u32::try_from(len).map_err(|_| WireError::TooManyNodes(len))
}

pub(crate) fn write_dialog(dialog: &Dialog, writer: &mut impl NodeWriter) -> Result<(), WireError> {
    writer.put_u16(dialog.id().get())?;
    writer.put_str(dialog.title())?;
    writer.put_u16(dialog.entry().get())?;
    writer.begin_nodes(node_len(dialog.page_count())?)?;
    for page in dialog.pages() {
        write_page(page, writer)?;
    }
    Ok(())
}

pub(crate) fn read_dialog(reader: &mut impl NodeReader) -> Result<Dialog, WireError> {
    let id = Id::from(reader.take_u16()?);
    let title = reader.take_str()?;
    let entry = Id::from(reader.take_u16()?);
    let page_count = reader.node_count()?;
    let mut pages = Vec::with_capacity(page_count as usize);
    for _ in 0..page_count {
        pages.push(read_page(reader)?);
    }
    Ok(Dialog::new(id, title, pages, entry)?)
}

fn write_page(page: &Page, writer: &mut impl NodeWriter) -> Result<(), WireError> {
    writer.put_u16(page.id.get())?;
    writer.put_str(&page.text)?;
    writer.begin_nodes(node_len(page.responses.len())?)?;
    for response in &page.responses {
        write_response(response, writer)?;
    }
    Ok(())
}

fn read_page(reader: &mut impl NodeReader) -> Result<Page, WireError> {
    let id = Id::from(reader.take_u16()?);
    let text = reader.take_str()?;
    let response_count = reader.node_count()?;
    let mut responses = Vec::with_capacity(response_count as usize);
    for _ in 0..response_count {
        responses.push(read_response(reader)?);
    }
    Ok(Page::new(id, text, responses))
}

fn write_response(response: &Response, writer: &mut impl NodeWriter) -> Result<(), WireError> {
    writer.put_u16(response.target.to_raw())?;
    writer.put_str(&response.text)?;
    writer.begin_nodes(node_len(response.extensions.len())?)?;
    for extension in &response.extensions {
        writer.put_str(extension)?;
    }
    Ok(())
}

fn read_response(reader: &mut impl NodeReader) -> Result<Response, WireError> {
    let target = Target::from_raw(reader.take_u16()?);
    let text = reader.take_str()?;
    let extension_count = reader.node_count()?;
    let mut extensions = Vec::with_capacity(extension_count as usize);
    for _ in 0..extension_count {
        extensions.push(reader.take_str()?);
    }
    Ok(Response { target, text, extensions })
}
