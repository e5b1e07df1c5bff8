//! Object storage adapter backed by a mounted bucket directory.
//!
//! `<root>/<bucket>/` is the bucket; each upload becomes one file named by
//! its key. The copy goes through a `.part` file and a rename, so a reader
//! never sees a half-written object; a failed copy removes its `.part`. Failures map onto the storage
//! service's error codes:
//!
//! | Condition                    | Code            |
//! |------------------------------|-----------------|
//! | bucket directory missing     | `NoSuchBucket`  |
//! | permission denied            | `AccessDenied`  |
//! | local source file missing    | `NoSuchFile`    |
//! | any other I/O failure        | `RequestFailed` |

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ObjectStorePort, TransferStatus};
use crate::error::UploadError;

const CHUNK: usize = 64 * 1024;

pub struct BucketDirectory {
    bucket: String,
    dir: PathBuf,
}

impl BucketDirectory {
    pub fn new(root: impl AsRef<Path>, bucket: impl Into<String>) -> Self {
        let bucket = bucket.into();
        Self {
            dir: root.as_ref().join(&bucket),
            bucket,
        }
    }

    /// Path an object with `key` lives at.
    pub fn object_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn copy(&self, src: &Path, key: &str, status: &TransferStatus) -> io::Result<()> {
        let mut input = File::open(src)?;
        status.begin(input.metadata()?.len());

        let part = self.dir.join(format!("{key}.part"));
        let result = File::create(&part).and_then(|mut output| {
            let mut buf = vec![0u8; CHUNK];
            loop {
                let n = input.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                output.write_all(&buf[..n])?;
                status.advance(n as u64);
            }
            output.sync_all()?;
            fs::rename(&part, self.object_path(key))
        });
        if result.is_err() {
            match fs::remove_file(&part) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => {
                    warn!("object store: could not remove {}: {}", part.display(), e);
                }
                _ => {}
            }
        }
        result
    }
}

fn code_for(err: &io::Error) -> &'static str {
    match err.kind() {
        io::ErrorKind::PermissionDenied => "AccessDenied",
        io::ErrorKind::NotFound => "NoSuchFile",
        _ => "RequestFailed",
    }
}

impl ObjectStorePort for BucketDirectory {
    fn upload(
        &mut self,
        path: &Path,
        key: &str,
        status: &TransferStatus,
    ) -> Result<(), UploadError> {
        if !self.dir.is_dir() {
            return Err(UploadError::new(
                "NoSuchBucket",
                format!("bucket {} not found at {}", self.bucket, self.dir.display()),
            ));
        }
        self.copy(path, key, status)
            .map_err(|e| UploadError::new(code_for(&e), e.to_string()))?;
        info!("object store: {}/{} written", self.bucket, key);
        Ok(())
    }
}
