use anyhow::{Context, Result};
use ignore::WalkBuilder;
use log::{debug, trace, warn};
use std::{fs, path::Path};

/// Total on-disk footprint of `path` in bytes.
///
/// Every entry below `path` contributes its `lstat` size, directories
/// included. Symbolic links are counted as links and never followed.
pub fn size_of_dir(path: &Path) -> Result<u64> {
    let meta = fs::symlink_metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?;
    if !meta.is_dir() {
        trace!("{} is not a directory ({} bytes)", path.display(), meta.len());
        return Ok(meta.len());
    }

    let walker = WalkBuilder::new(path).standard_filters(false).follow_links(false).build();

    let mut total: u64 = 0;
    let mut entries: usize = 0;
    for res in walker {
        let dent = match res {
            Ok(dent) => dent,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", path.display(), e);
                continue;
            }
        };
        let len = if dent.depth() == 0 {
            meta.len()
        } else {
            match dent.metadata() {
                Ok(m) => m.len(),
                Err(e) => {
                    warn!("Failed to stat {}: {}", dent.path().display(), e);
                    continue;
                }
            }
        };
        total += len;
        entries += 1;
    }

    debug!("{} holds {} entries, {} bytes", path.display(), entries, total);
    Ok(total)
}
