// SPDX-License-Identifier: MIT
//
// utilbox-text — Text statistics for the character/word counter tool page.

pub mod counter;

pub use counter::TextStats;
