use std::path::Path;

use anyhow::Context as _;

use crate::{
    session::show::{SessionOpts, ShowSession},
    timeline::fragment::Fragment,
};

/// Header file name inside a show directory.
pub const HEADER_FILE: &str = "header.json";

/// Load a show laid out as `header.json` plus one `<slideId>.json` per slide.
///
/// A slide may ship a separately authored baseline as `<slideId>.original.json`;
/// otherwise the original tree is a copy of the loaded one. A slide that cannot be
/// read or parsed is reported as failed, so the returned session is either ready or
/// failed (never still loading).
#[tracing::instrument(skip(opts), fields(dir = %dir.display()))]
pub fn load_show_dir(dir: &Path, opts: SessionOpts) -> anyhow::Result<ShowSession> {
    let header_path = dir.join(HEADER_FILE);
    let header_json = std::fs::read_to_string(&header_path)
        .with_context(|| format!("read show header '{}'", header_path.display()))?;
    let mut session = ShowSession::from_header_json(&header_json, opts)
        .with_context(|| format!("parse show header '{}'", header_path.display()))?;

    let slide_ids = session.header().slide_list.clone();
    for id in &slide_ids {
        match read_fragment(dir, id) {
            Ok(fragment) => {
                session
                    .fragment_loaded(fragment)
                    .with_context(|| format!("merge slide '{id}'"))?;
            }
            Err(e) => {
                session.slide_failed(id, &format!("{e:#}"))?;
            }
        }
    }
    Ok(session)
}

fn read_fragment(dir: &Path, id: &str) -> anyhow::Result<Fragment> {
    let path = dir.join(format!("{id}.json"));
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("read slide '{}'", path.display()))?;

    let original_path = dir.join(format!("{id}.original.json"));
    if !original_path.is_file() {
        return Ok(Fragment::from_json(id, &text)?);
    }
    let original_text = std::fs::read_to_string(&original_path)
        .with_context(|| format!("read slide baseline '{}'", original_path.display()))?;
    let current = serde_json::from_str(&text)
        .with_context(|| format!("parse slide '{}'", path.display()))?;
    let original = serde_json::from_str(&original_text)
        .with_context(|| format!("parse slide baseline '{}'", original_path.display()))?;
    Ok(Fragment::from_pair(id, current, original)?)
}
