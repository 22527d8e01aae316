use rand::{rngs::StdRng, Rng, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use zio::{FileSink, FileSource, StreamConfig, ZioReader, ZioWriter};

pub struct TestHarness {
    _temp_file: NamedTempFile,
    path: PathBuf,
    rng: StdRng,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();
        let rng = StdRng::seed_from_u64(0x005E_ED42);
        Self {
            _temp_file: temp_file,
            path,
            rng,
        }
    }

    pub fn writer(&self, config: StreamConfig) -> ZioWriter<FileSink> {
        ZioWriter::create_with(&self.path, config).unwrap()
    }

    pub fn reader(&self, config: StreamConfig) -> ZioReader<FileSource> {
        ZioReader::open_with(&self.path, config).unwrap()
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[allow(dead_code)]
    pub fn bytes(&self) -> Vec<u8> {
        fs::read(&self.path).unwrap()
    }

    #[allow(dead_code)]
    pub fn truncate_last_bytes(&self, n: usize) {
        let data = fs::read(&self.path).unwrap();
        let new_len = data.len().saturating_sub(n);
        fs::write(&self.path, &data[..new_len]).unwrap();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    #[allow(dead_code)]
    pub fn gen_string(&mut self, len: usize) -> String {
        let mut s = String::with_capacity(len);
        for _ in 0..len {
            let c = (b'a' + (self.rng.gen::<u8>() % 26)) as char;
            s.push(c);
        }
        s
    }

    #[allow(dead_code)]
    pub fn gen_mixed_strings(&mut self, sizes: &[usize]) -> Vec<String> {
        sizes.iter().map(|&n| self.gen_string(n)).collect()
    }

    #[allow(dead_code)]
    pub fn gen_ints(&mut self, count: usize) -> Vec<i32> {
        (0..count).map(|_| self.rng.gen()).collect()
    }
}
