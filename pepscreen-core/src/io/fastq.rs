use crate::error::{ScreenError, ScreenResult};
use crate::seq::SeqRecord;
use crate::seq::traits::SeqBytes;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::marker::PhantomData;
use std::path::Path;

/// Streaming FASTQ reader. Quality lines are length-checked against the
/// sequence and then discarded; downstream scoring never uses them.
pub struct FastqRecords<R, S> {
    reader: R,
    line_no: usize,
    buf_line: String,
    _marker: PhantomData<S>,
}

impl<R: BufRead, S: SeqBytes> FastqRecords<R, S> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf_line: String::new(),
            _marker: PhantomData,
        }
    }

    fn next_nonempty_line(&mut self) -> Option<ScreenResult<(String, usize)>> {
        loop {
            let (line, line_no) = match self.next_line() {
                Some(Ok(value)) => value,
                Some(Err(err)) => return Some(Err(err)),
                None => return None,
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(Ok((line, line_no)));
        }
    }

    fn next_line(&mut self) -> Option<ScreenResult<(String, usize)>> {
        self.buf_line.clear();
        match self.reader.read_line(&mut self.buf_line) {
            Ok(0) => None,
            Ok(_) => {
                self.line_no += 1;
                let line_no = self.line_no;
                Some(Ok((std::mem::take(&mut self.buf_line), line_no)))
            }
            Err(err) => Some(Err(ScreenError::Io(err))),
        }
    }

    fn read_required_line(
        &mut self,
        msg: &'static str,
        line: usize,
    ) -> ScreenResult<(String, usize)> {
        match self.next_line() {
            Some(Ok(value)) => Ok(value),
            Some(Err(err)) => Err(err),
            None => Err(ScreenError::FastqFormat { msg, line }),
        }
    }
}

impl<R: BufRead, S: SeqBytes> Iterator for FastqRecords<R, S> {
    type Item = ScreenResult<SeqRecord<S>>;

    fn next(&mut self) -> Option<Self::Item> {
        let (header_line, header_line_no) = match self.next_nonempty_line()? {
            Ok(value) => value,
            Err(err) => return Some(Err(err)),
        };

        if !header_line.starts_with('@') {
            return Some(Err(ScreenError::FastqFormat {
                msg: "expected header line starting with '@'",
                line: header_line_no,
            }));
        }

        let (id, desc) = match parse_header(&header_line, header_line_no) {
            Ok(parsed) => parsed,
            Err(err) => return Some(Err(err)),
        };

        let (seq_line, seq_line_no) = match self
            .read_required_line("missing sequence line", header_line_no.saturating_add(1))
        {
            Ok(value) => value,
            Err(err) => return Some(Err(err)),
        };

        let (plus_line, plus_line_no) = match self
            .read_required_line("missing '+' separator line", seq_line_no.saturating_add(1))
        {
            Ok(value) => value,
            Err(err) => return Some(Err(err)),
        };

        if !plus_line.starts_with('+') {
            return Some(Err(ScreenError::FastqFormat {
                msg: "expected '+' separator line",
                line: plus_line_no,
            }));
        }

        let (qual_line, qual_line_no) =
            match self.read_required_line("missing quality line", plus_line_no.saturating_add(1)) {
                Ok(value) => value,
                Err(err) => return Some(Err(err)),
            };

        let seq_line = trim_eol(&seq_line);
        let qual_line = trim_eol(&qual_line);
        let seq_bytes = seq_line.as_bytes().to_vec();

        if seq_bytes.len() != qual_line.len() {
            return Some(Err(ScreenError::FastqFormat {
                msg: "sequence and quality lengths differ",
                line: qual_line_no,
            }));
        }

        let seq = match S::from_bytes(seq_bytes) {
            Ok(seq) => seq,
            Err(err) => return Some(Err(err)),
        };

        let record = match desc {
            Some(desc) => SeqRecord::new(id, seq).with_desc(desc),
            None => SeqRecord::new(id, seq),
        };
        Some(Ok(record))
    }
}

pub fn fastq_records_from_reader<R: BufRead, S: SeqBytes>(reader: R) -> FastqRecords<R, S> {
    FastqRecords::new(reader)
}

pub fn read_fastq_records_from_reader<R: BufRead, S: SeqBytes>(
    reader: R,
) -> ScreenResult<Vec<SeqRecord<S>>> {
    let mut out = Vec::new();
    for record in fastq_records_from_reader(reader) {
        out.push(record?);
    }
    Ok(out)
}

pub fn read_fastq_records_from_path<S: SeqBytes>(
    path: impl AsRef<Path>,
) -> ScreenResult<Vec<SeqRecord<S>>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    read_fastq_records_from_reader(reader)
}

pub fn read_fastq_records_from_bytes<S: SeqBytes>(data: &[u8]) -> ScreenResult<Vec<SeqRecord<S>>> {
    let reader = BufReader::new(Cursor::new(data));
    read_fastq_records_from_reader(reader)
}

fn trim_eol(line: &str) -> &str {
    line.trim_end_matches(&['\n', '\r'][..])
}

fn parse_header(header_line: &str, line_no: usize) -> ScreenResult<(Box<str>, Option<Box<str>>)> {
    let header = header_line
        .strip_prefix('@')
        .ok_or(ScreenError::FastqFormat {
            msg: "expected header line starting with '@'",
            line: line_no,
        })?;

    let header = header.trim_end_matches(&['\n', '\r'][..]).trim_start();
    if header.is_empty() {
        return Err(ScreenError::FastqFormat {
            msg: "empty header",
            line: line_no,
        });
    }

    let (id, desc) = match header.find(|c: char| c.is_whitespace()) {
        Some(idx) => {
            let id = &header[..idx];
            let desc = header[idx..].trim();
            let desc = if desc.is_empty() { None } else { Some(desc) };
            (id, desc)
        }
        None => (header, None),
    };

    Ok((id.into(), desc.map(|s| s.into())))
}
