use crate::sequence::Sequence;
use abpredict_core::error::AbpredictError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Residues per line in written FASTA files
const LINE_WIDTH: usize = 80;

/// Write sequences to a FASTA file, replacing any existing file
pub fn write_fasta<P: AsRef<Path>>(path: P, sequences: &[Sequence]) -> Result<(), AbpredictError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_fasta_to_writer(&mut writer, sequences)?;
    writer.flush()?;
    Ok(())
}

pub fn write_fasta_to_writer<W: Write>(
    writer: &mut W,
    sequences: &[Sequence],
) -> Result<(), AbpredictError> {
    for seq in sequences {
        writeln!(writer, "{}", seq.header())?;
        for chunk in seq.sequence.chunks(LINE_WIDTH) {
            writer.write_all(chunk)?;
            writer.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_fasta_to_writer() {
        let sequences = vec![
            Sequence::new("seq1".to_string(), b"MKT".to_vec()),
            Sequence::new("seq2".to_string(), b"MKS".to_vec())
                .with_description("efflux pump".to_string()),
        ];

        let mut out = Vec::new();
        write_fasta_to_writer(&mut out, &sequences).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            ">seq1\nMKT\n>seq2 efflux pump\nMKS\n"
        );
    }

    #[test]
    fn test_long_sequences_wrap() {
        let seq = Sequence::new("long".to_string(), vec![b'A'; 100]);
        let mut out = Vec::new();
        write_fasta_to_writer(&mut out, &[seq]).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].len(), 80);
        assert_eq!(lines[2].len(), 20);
    }

    #[test]
    fn test_write_fasta_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("query.faa");

        write_fasta(&path, &[Sequence::new("q".to_string(), b"MKT".to_vec())]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), ">q\nMKT\n");
    }

    #[test]
    fn test_empty_input_writes_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.faa");

        write_fasta(&path, &[]).unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }
}
