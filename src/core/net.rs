// src/core/net.rs
// Auxiliary binary download (PDFs). Independent from the browser session.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
    time::Duration,
};

use reqwest::blocking::Client;
use url::Url;

use crate::config::consts::{CHUNK_SIZE, HTTP_TIMEOUT_SECS};
use crate::error::Result;
use crate::file::ensure_directory;

pub fn http_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(concat!("or_scrape/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Stream `url` into `path` in fixed-size chunks. Overwrites `path`.
/// Non-2xx responses and transport errors are returned as-is; no retry.
pub fn download_to_file(client: &Client, url: &str, path: &Path) -> Result<u64> {
    let mut resp = client.get(url).send()?.error_for_status()?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let mut out = BufWriter::new(File::create(path)?);

    let mut buf = [0u8; CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = resp.read(&mut buf)?;
        if n == 0 { break; }
        out.write_all(&buf[..n])?;
        total += n as u64;
    }
    out.flush()?;
    Ok(total)
}

/// `…/forum?id=X` → `…/pdf?id=X`. `None` for anything that is not a forum link.
pub fn pdf_url(forum_url: &str) -> Option<String> {
    let mut url = Url::parse(forum_url).ok()?;
    if url.path() != "/forum" || url.query().is_none() {
        return None;
    }
    url.set_path("/pdf");
    Some(url.into())
}
