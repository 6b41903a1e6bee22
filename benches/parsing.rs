//! Benchmarks for manuscript parsing.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use tsugumi::aozora::expand_references;
use tsugumi::{AozoraFormat, Fragment, Segment, SimpleStyle, StyledSegment};

const HEADER: &str = "\
吾輩は猫である
夏目漱石

-------------------------------------------------------
【テキスト中に現れる記号について】

《》：ルビ
（例）吾輩《わがはい》
-------------------------------------------------------

";

const MARKED_UP: &[&str] = &[
    "［＃３字下げ］一［＃「一」は大見出し］",
    "　吾輩《わがはい》は猫である。名前はまだ無い。",
    "　どこで生れたかとんと見当《けんとう》がつかぬ。何でも薄暗いじめじめした所でニャーニャー泣いていた事だけは記憶している。",
    "　吾輩はここで始めて［＃傍点］人間［＃傍点終わり］というものを見た。",
    "　※［＃「てへん＋劣」、第3水準1-84-77］の字と｜大和《やまと》の国、〔Cafe`〕の看板。",
    "［＃ここから２字下げ］",
    "　この書生というのは時々我々を捕《つかま》えて煮《に》て食うという話である。",
    "［＃ここで字下げ終わり］",
];

/// A synthetic manuscript of `chapters` chapters of marked-up text.
fn manuscript(chapters: usize) -> String {
    let mut text = String::from(HEADER);
    for index in 0..chapters {
        if index > 0 {
            text.push_str("［＃改ページ］\n");
        }
        for _ in 0..20 {
            for line in MARKED_UP {
                text.push_str(line);
                text.push('\n');
            }
        }
    }
    text.push_str("［＃本文終わり］\n\n底本：「夏目漱石全集1」ちくま文庫\n");
    text
}

fn plain_manuscript(lines: usize) -> String {
    let mut text = String::from("題\n著者\n\n");
    for _ in 0..lines {
        text.push_str("　吾輩は猫である。名前はまだ無い。どこで生れたかとんと見当がつかぬ。\n");
    }
    text
}

// ============================================================================
// Whole Manuscript Benchmarks
// ============================================================================

fn bench_parse_marked_up(c: &mut Criterion) {
    let text = manuscript(10);
    let format = AozoraFormat::new();

    c.bench_function("parse_marked_up", |b| {
        b.iter(|| format.parse_str(&text, "/books").unwrap());
    });
}

fn bench_parse_plain(c: &mut Criterion) {
    let text = plain_manuscript(1600);
    let format = AozoraFormat::new();

    c.bench_function("parse_plain", |b| {
        b.iter(|| format.parse_str(&text, "/books").unwrap());
    });
}

fn bench_parse_shift_jis(c: &mut Criterion) {
    let text = manuscript(10);
    let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode(&text);
    let format = AozoraFormat::new();

    c.bench_function("parse_shift_jis", |b| {
        b.iter(|| format.parse_bytes(&bytes, "/books").unwrap());
    });
}

// ============================================================================
// Line Pass Benchmarks
// ============================================================================

fn bench_expand_references(c: &mut Criterion) {
    let line = MARKED_UP[4];

    c.bench_function("expand_references", |b| {
        b.iter(|| expand_references(line).unwrap());
    });
}

fn bench_fragment_splice(c: &mut Criterion) {
    let text = MARKED_UP[2];

    c.bench_function("fragment_splice", |b| {
        b.iter(|| {
            let mut fragment = Fragment::new(text);
            for start in (0..fragment.len() - 2).step_by(4) {
                let inner = fragment.sub_segment(start, start + 2).unwrap();
                let styled: Segment = StyledSegment::new(inner, SimpleStyle::Bold).into();
                fragment.replace(start, start + 2, Some(styled)).unwrap();
            }
            fragment
        });
    });
}

criterion_group!(
    benches,
    // Whole manuscript
    bench_parse_marked_up,
    bench_parse_plain,
    bench_parse_shift_jis,
    // Line passes
    bench_expand_references,
    bench_fragment_splice,
);
criterion_main!(benches);
