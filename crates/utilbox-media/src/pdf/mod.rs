// SPDX-License-Identifier: MIT
//
// PDF module — splitting, compressing, and creating PDF documents.

pub mod compress;
pub mod reader;
pub mod writer;

pub use compress::PdfCompressor;
pub use reader::PdfReader;
pub use writer::PdfWriter;
