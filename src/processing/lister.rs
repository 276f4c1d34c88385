use tracing::{debug, info};
use crate::core::RemoteImageRecord;
use crate::remote::{MediaService, MAX_PAGE_SIZE};
use crate::utils::OptimizerResult;

/// Collects every image stored under `prefix`, following continuation
/// cursors until the service stops returning one.
///
/// A failed page fails the whole listing; partial inventories are never
/// returned.
pub async fn list_all_images<S>(service: &S, prefix: &str) -> OptimizerResult<Vec<RemoteImageRecord>>
where
    S: MediaService + ?Sized,
{
    let mut records = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page_index = 0;

    loop {
        let page = service
            .list_page(prefix, MAX_PAGE_SIZE, cursor.as_deref())
            .await?;
        page_index += 1;
        debug!("Listed page {} - {} records", page_index, page.resources.len());

        records.extend(page.resources);

        // An empty cursor means the same as none
        match page.next_cursor.filter(|c| !c.is_empty()) {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    info!("Found {} images under '{}' in {} pages", records.len(), prefix, page_index);
    Ok(records)
}
