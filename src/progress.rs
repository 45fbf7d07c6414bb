//! Spinner-style progress reporting for `verbose` training runs, mirroring
//! the progress-bar convention used elsewhere in this crate's lineage.
#![cfg(feature = "progress")]

pub(crate) fn bar(n: u64) -> indicatif::ProgressBar {
    let style = "{spinner:.cyan} {elapsed} ~ {percent:>3}% {wide_bar:.cyan}";
    let style = indicatif::ProgressStyle::with_template(style).expect("static template is valid");
    let bar = indicatif::ProgressBar::new(n);
    bar.set_style(style);
    bar
}
