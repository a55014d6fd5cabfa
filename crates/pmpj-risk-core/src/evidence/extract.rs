use std::time::Duration;

use thiserror::Error;

/// Why a document's text could not be read.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF could not be parsed: {0}")]
    Parse(String),

    #[error("page rasterisation failed: {0}")]
    Rasterize(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("OCR timed out after {0:?}")]
    Timeout(Duration),

    #[error("I/O error during extraction: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of a document's text, one string per page, at most `max_pages`.
pub trait DocumentReader {
    /// Text embedded in the document itself.
    fn text_layer(&self, pdf: &[u8], max_pages: usize) -> Result<Vec<String>, ExtractionError>;

    /// Optical recognition over rendered page images.
    fn recognize(&self, pdf: &[u8], max_pages: usize) -> Result<Vec<String>, ExtractionError>;
}

#[cfg(feature = "pdf")]
pub use pdf::PdfDocumentReader;

#[cfg(feature = "pdf")]
mod pdf {
    use std::fs::{self, File};
    use std::path::{Path, PathBuf};
    use std::process::{Command, ExitStatus, Stdio};
    use std::thread;
    use std::time::{Duration, Instant};

    use super::{DocumentReader, ExtractionError};
    use crate::config::OcrConfig;

    const POLL_INTERVAL: Duration = Duration::from_millis(25);

    /// Reads PDFs with `lopdf`, falling back to `pdftoppm` + `tesseract`
    /// for scanned pages.
    #[derive(Debug, Clone, Default)]
    pub struct PdfDocumentReader {
        pub ocr: OcrConfig,
    }

    impl PdfDocumentReader {
        pub fn new(ocr: OcrConfig) -> Self {
            Self { ocr }
        }

        fn budget(&self) -> Duration {
            Duration::from_secs(self.ocr.timeout_secs)
        }

        fn rasterize(
            &self,
            pdf_path: &Path,
            workdir: &Path,
            max_pages: usize,
            deadline: Instant,
        ) -> Result<Vec<PathBuf>, ExtractionError> {
            let log_path = workdir.join("pdftoppm.log");
            let mut cmd = Command::new(&self.ocr.pdftoppm_bin);
            cmd.arg("-r")
                .arg(self.ocr.resolution_dpi.to_string())
                .arg("-f")
                .arg("1")
                .arg("-l")
                .arg(max_pages.to_string())
                .arg("-png")
                .arg(pdf_path)
                .arg(workdir.join("page"))
                .stdout(Stdio::null())
                .stderr(File::create(&log_path)?);

            let status = run_until(cmd, deadline, self.budget())?;
            if !status.success() {
                return Err(ExtractionError::Rasterize(failure_detail(status, &log_path)));
            }

            let mut pages: Vec<PathBuf> = fs::read_dir(workdir)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| {
                    p.extension().is_some_and(|ext| ext == "png")
                        && p.file_name()
                            .and_then(|n| n.to_str())
                            .is_some_and(|n| n.starts_with("page"))
                })
                .collect();
            // pdftoppm zero-pads page numbers, so name order is page order.
            pages.sort();
            pages.truncate(max_pages);
            Ok(pages)
        }

        fn recognize_page(
            &self,
            image: &Path,
            workdir: &Path,
            index: usize,
            deadline: Instant,
        ) -> Result<String, ExtractionError> {
            let out_base = workdir.join(format!("ocr-{}", index));
            let log_path = workdir.join(format!("ocr-{}.log", index));
            let mut cmd = Command::new(&self.ocr.tesseract_bin);
            cmd.arg(image)
                .arg(&out_base)
                .arg("-l")
                .arg(&self.ocr.languages)
                .arg("--psm")
                .arg(self.ocr.page_segmentation_mode.to_string())
                .stdout(Stdio::null())
                .stderr(File::create(&log_path)?);

            let status = run_until(cmd, deadline, self.budget())?;
            if !status.success() {
                return Err(ExtractionError::Ocr(failure_detail(status, &log_path)));
            }
            Ok(fs::read_to_string(out_base.with_extension("txt"))?)
        }
    }

    impl DocumentReader for PdfDocumentReader {
        fn text_layer(&self, pdf: &[u8], max_pages: usize) -> Result<Vec<String>, ExtractionError> {
            let doc = lopdf::Document::load_mem(pdf)
                .map_err(|e| ExtractionError::Parse(e.to_string()))?;
            let page_numbers: Vec<u32> = doc.get_pages().keys().copied().take(max_pages).collect();

            let mut pages = Vec::with_capacity(page_numbers.len());
            for number in page_numbers {
                let text = doc
                    .extract_text(&[number])
                    .map_err(|e| ExtractionError::Parse(format!("page {}: {}", number, e)))?;
                pages.push(text);
            }
            Ok(pages)
        }

        fn recognize(&self, pdf: &[u8], max_pages: usize) -> Result<Vec<String>, ExtractionError> {
            let deadline = Instant::now() + self.budget();
            let workdir = tempfile::tempdir()?;
            let pdf_path = workdir.path().join("document.pdf");
            fs::write(&pdf_path, pdf)?;

            let images = self.rasterize(&pdf_path, workdir.path(), max_pages, deadline)?;
            tracing::debug!(pages = images.len(), "running OCR over rasterised pages");

            images
                .iter()
                .enumerate()
                .map(|(i, image)| self.recognize_page(image, workdir.path(), i, deadline))
                .collect()
        }
    }

    /// Wait for `cmd` to finish, killing it once `deadline` passes.
    fn run_until(
        mut cmd: Command,
        deadline: Instant,
        budget: Duration,
    ) -> Result<ExitStatus, ExtractionError> {
        let mut child = cmd.spawn()?;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ExtractionError::Timeout(budget));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn failure_detail(status: ExitStatus, log_path: &Path) -> String {
        let log = fs::read_to_string(log_path).unwrap_or_default();
        let log = log.trim();
        if log.is_empty() {
            format!("exited with {}", status)
        } else {
            format!("exited with {}: {}", status, log)
        }
    }

}
