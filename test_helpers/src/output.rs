//! In-memory writer for asserting on rendered help.
//!
//! # Examples
//!
//! ```
//! use std::io::Write;
//! use argtree_test_helpers::output::SharedBuffer;
//!
//! let buffer = SharedBuffer::default();
//! let mut writer = buffer.clone();
//! writer.write_all(b"Usage: app").unwrap();
//! assert_eq!(buffer.contents(), "Usage: app");
//! ```

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// Cloneable buffer: hand one clone to the code under test, read the other.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Everything written so far, lossily decoded as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.lock().is_empty()
    }

    /// Discards the captured bytes.
    pub fn clear(&self) {
        self.bytes.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
