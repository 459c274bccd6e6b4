#![no_main]
use std::cell::RefCell;

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use markstrip::{Capture, MarkupStripper, StripOptions, Stripper, normalize_space, split_seeded};
use rand::rngs::SmallRng; // faster than StdRng
use rand::{Rng, RngCore, SeedableRng};

const HEADER: usize = 9; // 1 flag + 8-byte split seed

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// Building blocks the structured mutator stitches together.
#[derive(Debug, Arbitrary)]
enum Fragment {
    Text(String),
    Tag { name: TagName, closing: bool, self_closing: bool, attr: Option<String> },
    Comment(String),
    CData(String),
    Declaration(String),
    Entity(EntityBody),
    /// Markup cut short, as at the end of a truncated field.
    Open(OpenKind),
    Whitespace(u8),
}

#[derive(Debug, Arbitrary)]
enum TagName {
    P,
    B,
    Script,
    Style,
    Other(String),
}

#[derive(Debug, Arbitrary)]
enum EntityBody {
    Named(u8),
    Decimal(u32),
    Hex(u32),
    Raw(String),
}

#[derive(Debug, Arbitrary)]
enum OpenKind {
    Lt,
    Tag,
    Comment,
    CData,
    Amp,
}

impl Fragment {
    fn render(&self, out: &mut String) {
        match self {
            Fragment::Text(text) => out.push_str(text),
            Fragment::Tag { name, closing, self_closing, attr } => {
                out.push('<');
                if *closing {
                    out.push('/');
                }
                out.push_str(match name {
                    TagName::P => "p",
                    TagName::B => "B",
                    TagName::Script => "script",
                    TagName::Style => "STYLE",
                    TagName::Other(name) => name,
                });
                if let Some(attr) = attr {
                    out.push_str(" data-x=\"");
                    out.push_str(attr);
                    out.push('"');
                }
                if *self_closing {
                    out.push('/');
                }
                out.push('>');
            }
            Fragment::Comment(body) => {
                out.push_str("<!--");
                out.push_str(body);
                out.push_str("-->");
            }
            Fragment::CData(body) => {
                out.push_str("<![CDATA[");
                out.push_str(body);
                out.push_str("]]>");
            }
            Fragment::Declaration(body) => {
                out.push_str("<!");
                out.push_str(body);
                out.push('>');
            }
            Fragment::Entity(body) => {
                out.push('&');
                match body {
                    EntityBody::Named(index) => {
                        let table = markstrip::NAMED_ENTITIES;
                        out.push_str(table[usize::from(*index) % table.len()].0);
                    }
                    EntityBody::Decimal(value) => out.push_str(&format!("#{value}")),
                    EntityBody::Hex(value) => out.push_str(&format!("#x{value:X}")),
                    EntityBody::Raw(raw) => out.push_str(raw),
                }
                out.push(';');
            }
            Fragment::Open(kind) => out.push_str(match kind {
                OpenKind::Lt => "<",
                OpenKind::Tag => "<p class=\"",
                OpenKind::Comment => "<!-- ",
                OpenKind::CData => "<![CDATA[",
                OpenKind::Amp => "&am",
            }),
            Fragment::Whitespace(kind) => out.push_str(match kind % 4 {
                0 => " ",
                1 => "\u{A0}",
                2 => "\n\t ",
                _ => "\u{3000}",
            }),
        }
    }
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if max_size <= HEADER || (size >= HEADER && !seed.is_multiple_of(10)) {
        return fuzzer_mutate(data, size, max_size);
    }

    data[0] = with_rng(|rng| rng.next_u32() as u8);
    data[1..HEADER].copy_from_slice(&with_rng(|rng| rng.next_u64().to_le_bytes()));

    let raw: Vec<u8> = with_rng(|rng| {
        let len = rng.random_range(0..=max_size.min(4096));
        (0..len).map(|_| rng.random::<u8>()).collect()
    });
    let fragments: Vec<Fragment> =
        Vec::arbitrary(&mut Unstructured::new(&raw)).unwrap_or_default();
    let mut text = String::new();
    for fragment in &fragments {
        fragment.render(&mut text);
    }

    let len = text.len().min(max_size - HEADER);
    data[HEADER..HEADER + len].copy_from_slice(&text.as_bytes()[..len]);
    HEADER + len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

fn strip(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }
    let flags = data[0];
    let split_seed = u64::from_le_bytes(data[1..HEADER].try_into().unwrap());
    let input = String::from_utf8_lossy(&data[HEADER..]).into_owned();

    let options = StripOptions {
        opaque_elements: if flags & 1 != 0 {
            Vec::new()
        } else {
            StripOptions::default().opaque_elements
        },
        max_entity_len: if flags & 2 != 0 { 4 } else { 32 },
    };
    let stripper = Stripper::new(&options);
    let expected = stripper.strip(&input);

    // Chunking must not change the result.
    let mut streamed = stripper.stream();
    let mut text = String::new();
    for chunk in split_seeded(&input, split_seed) {
        text.extend(streamed.feed(chunk).map(Capture::into_owned));
    }
    text.extend(streamed.finish().map(Capture::into_owned));
    assert_eq!(text, expected);

    // Neither does reading it from a stream.
    assert_eq!(stripper.strip_reader(input.as_bytes()).unwrap(), expected);

    assert!(expected.chars().count() <= input.chars().count());

    let normalized = normalize_space(expected.as_str());
    assert_eq!(normalize_space(normalized.as_str()), normalized);
}

fuzz_target!(|data: &[u8]| strip(data));
