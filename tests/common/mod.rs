#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use bulk_image_optimizer_lib::core::{
    RemoteImageRecord,
    ResourcePage,
    TransformationRequest,
    TransformationResult,
};
use bulk_image_optimizer_lib::{MediaService, OptimizerError, OptimizerResult};

/// Scripted media service: serves fixed pages and answers transformations
/// from a table, tracking how many requests are in flight.
#[derive(Default)]
pub struct FakeMediaService {
    pages: Vec<ResourcePage>,
    fail_listing_on_page: Option<usize>,
    failing_ids: HashSet<String>,
    results: HashMap<String, (u64, String)>,
    pub list_calls: Mutex<Vec<(u32, Option<String>)>>,
    pub transform_calls: Mutex<Vec<TransformationRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

pub fn record(public_id: &str, bytes: u64, format: &str) -> RemoteImageRecord {
    RemoteImageRecord {
        public_id: public_id.to_string(),
        bytes,
        format: format.to_string(),
    }
}

/// `count` png records named `french-dandy/img-0000`, `french-dandy/img-0001`, ...
pub fn records(count: usize) -> Vec<RemoteImageRecord> {
    (0..count)
        .map(|i| record(&format!("french-dandy/img-{:04}", i), 10_000 + i as u64, "png"))
        .collect()
}

impl FakeMediaService {
    /// Serves `records` in pages of `page_size`, chaining them with cursors
    pub fn with_records(records: Vec<RemoteImageRecord>, page_size: usize) -> Self {
        let mut pages: Vec<ResourcePage> = records
            .chunks(page_size)
            .map(|chunk| ResourcePage { resources: chunk.to_vec(), next_cursor: None })
            .collect();
        if pages.is_empty() {
            pages.push(ResourcePage::default());
        }
        let last = pages.len() - 1;
        for (index, page) in pages.iter_mut().enumerate() {
            if index < last {
                page.next_cursor = Some(format!("cursor-{}", index + 1));
            }
        }
        Self::with_pages(pages)
    }

    pub fn with_pages(pages: Vec<ResourcePage>) -> Self {
        Self { pages, ..Self::default() }
    }

    /// The listing request for page `page_index` (0-based) fails
    pub fn failing_listing_on_page(mut self, page_index: usize) -> Self {
        self.fail_listing_on_page = Some(page_index);
        self
    }

    pub fn failing_transform_for(mut self, public_id: &str) -> Self {
        self.failing_ids.insert(public_id.to_string());
        self
    }

    pub fn transform_result(mut self, public_id: &str, bytes: u64, format: &str) -> Self {
        self.results.insert(public_id.to_string(), (bytes, format.to_string()));
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn transform_count(&self) -> usize {
        self.transform_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaService for FakeMediaService {
    async fn list_page(
        &self,
        _prefix: &str,
        max_results: u32,
        next_cursor: Option<&str>,
    ) -> OptimizerResult<ResourcePage> {
        self.list_calls
            .lock()
            .unwrap()
            .push((max_results, next_cursor.map(str::to_string)));

        let index = match next_cursor {
            None => 0,
            Some(cursor) => cursor
                .strip_prefix("cursor-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| OptimizerError::remote(format!("unknown cursor {}", cursor)))?,
        };

        if self.fail_listing_on_page == Some(index) {
            return Err(OptimizerError::remote("503 Service Unavailable"));
        }

        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| OptimizerError::remote(format!("no page {}", index)))
    }

    async fn transform(&self, request: &TransformationRequest) -> OptimizerResult<TransformationResult> {
        self.transform_calls.lock().unwrap().push(request.clone());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        // Let the other requests of the chunk start before this one settles
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_ids.contains(&request.source_public_id) {
            return Err(OptimizerError::remote(format!(
                "400 Bad Request: cannot transform {}", request.source_public_id
            )));
        }

        let (bytes, format) = self
            .results
            .get(&request.source_public_id)
            .cloned()
            .unwrap_or_else(|| (2_500, "webp".to_string()));

        Ok(TransformationResult {
            public_id: request.destination_public_id.clone(),
            bytes,
            format,
        })
    }
}
