use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, ErrorKind, Read};
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Wraps a byte source in a line reader, decompressing it when it starts with
/// the gzip magic number.
///
/// The first two bytes are read up front (short reads are retried) and put
/// back in front of the stream, so a plain-text source loses nothing.
/// Multi-member streams (bgzip) are read to the end.
pub fn open_vcf_stream<'a, R: Read + 'a>(mut reader: R) -> std::io::Result<Box<dyn BufRead + 'a>> {
    let mut magic = [0u8; 2];
    let mut filled = 0;
    while filled < magic.len() {
        match reader.read(&mut magic[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    let is_gzipped = filled == magic.len() && magic == GZIP_MAGIC;
    let stream = BufReader::new(Cursor::new(magic[..filled].to_vec()).chain(reader));

    if is_gzipped {
        log::debug!("Detected gzip-compressed VCF stream");
        let decoder = flate2::bufread::MultiGzDecoder::new(stream);
        Ok(Box::new(BufReader::new(decoder)))
    } else {
        Ok(Box::new(stream))
    }
}

pub fn open_vcf_file(file_path: &Path) -> std::io::Result<Box<dyn BufRead>> {
    let file = File::open(file_path)?;
    log::debug!("File {} opened successfully", file_path.display());
    open_vcf_stream(file)
}
