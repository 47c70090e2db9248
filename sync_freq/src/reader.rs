use std::{io::BufRead, path::Path};

use anyhow::Context;
use compress_io::compress::CompressIo;
use crossbeam_channel::Sender;
use sync_core::site::{SiteParser, SiteRecord};
use utils::get_next_line;

/// Number of rows sent to the processing thread at a time
pub const BATCH_SIZE: usize = 4096;

/// A parsed SYNC row, or the reason it could not be parsed.
/// line is the (1 based) line number in the input file
pub struct Row {
    pub line: usize,
    pub site: anyhow::Result<SiteRecord>,
}

pub type Batch = Vec<Row>;

/// Read SYNC rows from rdr, sending batches of parsed rows down snd
///
/// Parse failures are passed on (with file, line and, where readable, the
/// chromosome and position) so that the processing thread can apply the
/// malformed row policy in one place.  I/O errors end the reading.
pub fn read_sync<R: BufRead>(
    mut rdr: R,
    fname: &Path,
    n_pops: usize,
    snd: Sender<Batch>,
) -> anyhow::Result<usize> {
    let mut buf = String::new();
    let mut line = 0;
    let mut parser = SiteParser::new(n_pops);
    let mut batch = Vec::with_capacity(BATCH_SIZE);
    let mut n = 0;

    while let Some(fields) = get_next_line(&mut rdr, &mut buf)
        .with_context(|| format!("Error after reading {} lines from {}", line, fname.display()))?
    {
        line += 1;
        // Skip blank lines
        if fields.len() == 1 && fields[0].is_empty() {
            continue;
        }
        let site = parser.parse(&fields).with_context(|| {
            format!(
                "{}:{} Error parsing SYNC row ({}:{})",
                fname.display(),
                line,
                fields[0],
                fields.get(1).unwrap_or(&"?")
            )
        });
        batch.push(Row { line, site });
        n += 1;
        if batch.len() >= BATCH_SIZE {
            let b = std::mem::replace(&mut batch, Vec::with_capacity(BATCH_SIZE));
            if snd.send(b).is_err() {
                // Receiver has closed down (it will report why)
                trace!("SYNC reader stopping early after {} lines", line);
                return Ok(n);
            }
        }
    }
    if !batch.is_empty() && snd.send(batch).is_err() {
        trace!("SYNC reader: receiver closed before final batch");
    }
    debug!(
        "Finished reading {} lines from {}; {} rows",
        line,
        fname.display(),
        n
    );
    Ok(n)
}

pub fn read_sync_file(fname: &Path, n_pops: usize, snd: Sender<Batch>) -> anyhow::Result<usize> {
    trace!("Opening SYNC file {} for reading", fname.display());
    let rdr = CompressIo::new()
        .path(fname)
        .bufreader()
        .with_context(|| format!("Error opening SYNC file {}", fname.display()))?;
    read_sync(rdr, fname, n_pops, snd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::io::Cursor;

    #[test]
    fn batches() {
        let mut s = String::new();
        for i in 0..(BATCH_SIZE + 10) {
            s.push_str(&format!("chr2\t{}\tA\t30:0:0:0:0:0\n", i + 1));
        }
        s.push_str("\nchr2\t99999\tA\t30:0:0:0\n");
        let (snd, rcv) = unbounded();
        let n = read_sync(Cursor::new(s), Path::new("test.sync"), 1, snd).unwrap();
        assert_eq!(n, BATCH_SIZE + 11);
        let v: Vec<Batch> = rcv.iter().collect();
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].len(), BATCH_SIZE);
        let last = v[1].last().unwrap();
        assert_eq!(last.line, BATCH_SIZE + 12);
        let e = last.site.as_ref().unwrap_err();
        assert!(format!("{:#}", e).contains("test.sync:4108"));
        assert!(format!("{:#}", e).contains("chr2:99999"));
    }
}
