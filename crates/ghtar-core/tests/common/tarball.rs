//! Builds small `.tar.gz` archives in memory.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use tar::{Builder, EntryType, Header};

pub enum Item<'a> {
    Dir(&'a str, u32),
    File(&'a str, u32, &'a [u8]),
    /// `pax_global_header`, as GitHub puts at the start of every tarball.
    PaxGlobal(&'a [u8]),
}

pub fn tar_gz(items: &[Item<'_>]) -> Vec<u8> {
    let mut builder = Builder::new(Vec::new());
    for item in items {
        let mut h = Header::new_gnu();
        match item {
            Item::Dir(path, mode) => {
                h.set_path(path).unwrap();
                h.set_entry_type(EntryType::Directory);
                h.set_mode(*mode);
                h.set_size(0);
                h.set_cksum();
                builder.append(&h, std::io::empty()).unwrap();
            }
            Item::File(path, mode, data) => {
                h.set_path(path).unwrap();
                h.set_entry_type(EntryType::Regular);
                h.set_mode(*mode);
                h.set_size(data.len() as u64);
                h.set_cksum();
                builder.append(&h, *data).unwrap();
            }
            Item::PaxGlobal(data) => {
                h.set_path("pax_global_header").unwrap();
                h.set_entry_type(EntryType::XGlobalHeader);
                h.set_mode(0o666);
                h.set_size(data.len() as u64);
                h.set_cksum();
                builder.append(&h, *data).unwrap();
            }
        }
    }
    let raw = builder.into_inner().unwrap();
    let mut gz = GzEncoder::new(Vec::new(), Compression::default());
    gz.write_all(&raw).unwrap();
    gz.finish().unwrap()
}
