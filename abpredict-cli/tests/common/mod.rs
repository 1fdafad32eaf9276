#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const HEADER: &str = "ORF_ID\tContig\tPredicted_Protein\tAMR Gene Family\tID\n";

/// Get the abpredict binary with an isolated home directory
pub fn abpredict_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("abpredict").unwrap();
    cmd.env("ABPREDICT_HOME", home)
        .env("ABPREDICT_SILENT", "1")
        .env_remove("ABPREDICT_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

pub fn write(path: &Path, content: &str) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
    path.to_path_buf()
}

/// Marker table with one row per (contig, protein, family)
pub fn marker_table(rows: &[(&str, &str, &str)]) -> String {
    let mut content = HEADER.to_string();
    for (i, (contig, protein, family)) in rows.iter().enumerate() {
        content.push_str(&format!("orf{}\t{}\t{}\t{}\tid{}\n", i, contig, protein, family, i));
    }
    content
}

/// Scratch space with a home directory for config lookups
pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("home")).unwrap();
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn home(&self) -> PathBuf {
        self.path().join("home")
    }

    pub fn cmd(&self) -> Command {
        abpredict_cmd(&self.home())
    }

    /// Config file pointing every tool at the given programs
    pub fn tools_config(&self, rgi: &Path, blastp: &Path, clinker: &Path) -> PathBuf {
        write(
            &self.path().join("abpredict.toml"),
            &format!(
                "[pipeline]\nncpus = 2\n\n[tools]\nrgi = \"{}\"\nrgi_args = []\nblastp = \"{}\"\nclinker = \"{}\"\n",
                rgi.display(),
                blastp.display(),
                clinker.display()
            ),
        )
    }

    /// Config file pointing the function predictor at `predictor`
    pub fn predictor_config(&self, predictor: &Path) -> PathBuf {
        write(
            &self.path().join("predict.toml"),
            &format!(
                "[pipeline]\nncpus = 2\n\n[tools]\npredictor = \"{}\"\n",
                predictor.display()
            ),
        )
    }
}

#[cfg(unix)]
pub fn create_mock_binary(dir: &Path, name: &str, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = write(&dir.join(name), script);
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// Writes `<output_file>.txt` with one marker named after the genome
pub const MOCK_RGI: &str = r#"#!/bin/sh
while [ "$#" -gt 0 ]; do
    case "$1" in
        --input_sequence) shift; IN="$1" ;;
        --output_file) shift; OUT="$1" ;;
    esac
    shift
done
G=$(basename "$IN" .fna)
printf 'ORF_ID\tContig\tPredicted_Protein\tAMR Gene Family\tID\norf1\t%s_contig\tMKTAYIAKQRQISFVKSHFSRQ\tfam\tid1\n' "$G" > "${OUT}.txt"
"#;

/// Reports every subject sequence as a strong hit
pub const MOCK_BLASTP: &str = r#"#!/bin/sh
while [ "$#" -gt 0 ]; do
    case "$1" in
        -subject) shift; SUBJECT="$1" ;;
        -out) shift; OUT="$1" ;;
    esac
    shift
done
: > "$OUT"
grep '^>' "$SUBJECT" | sed 's/^>//' | while read -r id; do
    printf 'q\t1\t10\t%s\t1\t10\t1e-20\t80.0\n' "$id" >> "$OUT"
done
"#;

/// Writes a two-cluster matrix with similarity 0.61
pub const MOCK_CLINKER: &str = r#"#!/bin/sh
A=$(basename "$1" .gbk)
B=$(basename "$2" .gbk)
printf ',%s,%s\n%s,1.0,0.61\n%s,0.61,1.0\n' "$A" "$B" "$A" "$B" > "$4"
"#;

/// Records the genome and the SSN switch it was called with
pub const MOCK_PREDICTOR: &str = r#"#!/bin/sh
G=$(basename "$1" .fna)
printf '%s\t%s\n' "$G" "$3" > "$2/prediction.txt"
"#;
