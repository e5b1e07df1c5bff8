//! Remote storage adapter: the object store and the record store behind
//! one value, so the service can borrow both mutably at once.

use std::path::Path;

use crate::adapters::object_store::BucketDirectory;
use crate::adapters::record_store::JsonLinesTable;
use crate::app::model::EnvironmentReading;
use crate::app::ports::{ObjectStorePort, RecordStorePort, TransferStatus};
use crate::error::{PersistenceError, UploadError};

pub struct CloudAdapter {
    objects: BucketDirectory,
    records: JsonLinesTable,
}

impl CloudAdapter {
    pub fn new(objects: BucketDirectory, records: JsonLinesTable) -> Self {
        Self { objects, records }
    }
}

impl ObjectStorePort for CloudAdapter {
    fn upload(
        &mut self,
        path: &Path,
        key: &str,
        status: &TransferStatus,
    ) -> Result<(), UploadError> {
        self.objects.upload(path, key, status)
    }
}

impl RecordStorePort for CloudAdapter {
    fn put(&mut self, reading: &EnvironmentReading) -> Result<(), PersistenceError> {
        self.records.put(reading)
    }
}
