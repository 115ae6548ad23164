// gen-dict: convert a TSV word list to the binary .glide dictionary format.
//
// Input lines are `word<TAB>frequency[<TAB>flags]`; `#` comments and blank
// lines are skipped, malformed lines warn and continue. Words are stored
// lowercased; duplicates keep the highest frequency.

use anyhow::{bail, Context, Result};
use clap::Parser;
use libswipe_core::dictionary::{
    DICT_HEADER_SIZE, DICT_MAGIC, DICT_VERSION, FLAG_PROFANITY, FLAG_PROPER_NOUN,
    HEADER_FLAG_SORTED, MAX_LANGUAGE_TAG_LENGTH, MAX_WORD_LENGTH,
};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Convert a TSV word list to a .glide dictionary")]
struct Args {
    /// Input TSV file (word<TAB>frequency[<TAB>flags])
    input: PathBuf,

    /// Output .glide binary file
    output: PathBuf,

    /// BCP 47 language tag
    #[arg(long, default_value = "en-US")]
    lang: String,

    /// Keep input order instead of sorting entries alphabetically
    #[arg(long)]
    no_sort: bool,

    /// Mark capitalized words as proper nouns
    #[arg(long)]
    proper_nouns: bool,
}

struct Entry {
    word: String,
    frequency: u32,
    flags: u8,
}

fn read_tsv(content: &str, proper_nouns: bool) -> Vec<Entry> {
    let mut entries = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split('\t');
        let Some(word) = parts.next().map(str::trim).filter(|w| !w.is_empty()) else {
            eprintln!("warning: line {line_num}: empty word, skipping");
            continue;
        };
        let Some(freq_str) = parts.next() else {
            eprintln!("warning: line {line_num}: expected 'word<TAB>frequency', got '{line}'");
            continue;
        };
        let frequency = match freq_str.trim().parse::<i64>() {
            Ok(f) if f < 0 => {
                eprintln!("warning: line {line_num}: negative frequency for '{word}', using 0");
                0
            }
            Ok(f) => u32::try_from(f).unwrap_or_else(|_| {
                eprintln!("warning: line {line_num}: frequency too large for '{word}', clamping");
                u32::MAX
            }),
            Err(_) => {
                eprintln!("warning: line {line_num}: invalid frequency '{freq_str}'");
                continue;
            }
        };

        if word.len() > MAX_WORD_LENGTH {
            eprintln!(
                "warning: line {line_num}: word '{word}' exceeds {MAX_WORD_LENGTH} bytes, skipping"
            );
            continue;
        }

        let mut flags = 0u8;
        if let Some(flag_str) = parts.next() {
            let flag_str = flag_str.trim().to_lowercase();
            if flag_str.contains("proper") {
                flags |= FLAG_PROPER_NOUN;
            }
            if flag_str.contains("profanity") {
                flags |= FLAG_PROFANITY;
            }
        }
        if proper_nouns && word.chars().next().is_some_and(char::is_uppercase) {
            flags |= FLAG_PROPER_NOUN;
        }

        entries.push(Entry {
            word: word.to_lowercase(),
            frequency,
            flags,
        });
    }

    entries
}

/// Collapse duplicate words, keeping the highest frequency seen. Input
/// order is preserved for `--no-sort` output.
fn dedupe(entries: Vec<Entry>) -> Vec<Entry> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<Entry> = Vec::with_capacity(entries.len());
    for entry in entries {
        match index.get(&entry.word) {
            Some(&i) => {
                if entry.frequency > out[i].frequency {
                    out[i] = entry;
                }
            }
            None => {
                index.insert(entry.word.clone(), out.len());
                out.push(entry);
            }
        }
    }
    out
}

fn encode(entries: &[Entry], language_tag: &str, sorted: bool) -> Result<Vec<u8>> {
    if language_tag.len() > MAX_LANGUAGE_TAG_LENGTH {
        bail!(
            "language tag '{language_tag}' exceeds {MAX_LANGUAGE_TAG_LENGTH} bytes"
        );
    }

    let header_flags: u16 = if sorted { HEADER_FLAG_SORTED } else { 0 };

    let mut buf = vec![0u8; DICT_HEADER_SIZE];
    buf[0..4].copy_from_slice(&DICT_MAGIC.to_le_bytes());
    buf[4..6].copy_from_slice(&DICT_VERSION.to_le_bytes());
    buf[6..8].copy_from_slice(&header_flags.to_le_bytes());
    buf[8..12].copy_from_slice(&(entries.len() as u32).to_le_bytes());
    buf[12..14].copy_from_slice(&(language_tag.len() as u16).to_le_bytes());
    buf[14..14 + language_tag.len()].copy_from_slice(language_tag.as_bytes());

    for entry in entries {
        buf.push(entry.word.len() as u8);
        buf.extend_from_slice(entry.word.as_bytes());
        buf.extend_from_slice(&entry.frequency.to_le_bytes());
        buf.push(entry.flags);
    }
    Ok(buf)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let mut entries = dedupe(read_tsv(&content, args.proper_nouns));
    if entries.is_empty() {
        bail!("no valid entries in {}", args.input.display());
    }

    let sorted = !args.no_sort;
    if sorted {
        entries.sort_by(|a, b| a.word.cmp(&b.word));
    }

    let data = encode(&entries, &args.lang, sorted)?;
    fs::write(&args.output, &data)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    let max_freq = entries.iter().map(|e| e.frequency).max().unwrap_or(0);
    let min_freq = entries.iter().map(|e| e.frequency).min().unwrap_or(0);
    println!("Wrote {} ({} bytes)", args.output.display(), data.len());
    println!("  language:   {}", args.lang);
    println!("  words:      {}", entries.len());
    println!("  sorted:     {}", if sorted { "yes" } else { "no" });
    println!("  freq range: {min_freq} - {max_freq}");
    println!("  format:     GLID v{DICT_VERSION}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use libswipe_core::Dictionary;

    #[test]
    fn tsv_round_trip_through_core_loader() {
        let tsv = "# comment\n\
                   hello\t50000\n\
                   World\t40000\tproper\n\
                   damn\t1000\tprofanity\n\
                   hello\t60000\n\
                   bad-line\n\
                   \n";
        let mut entries = dedupe(read_tsv(tsv, false));
        entries.sort_by(|a, b| a.word.cmp(&b.word));
        let data = encode(&entries, "en-US", true).unwrap();

        let mut dict = Dictionary::new();
        dict.load_from_memory(&data).unwrap();

        assert_eq!(dict.entry_count(), 3);
        assert_eq!(dict.header().flags & HEADER_FLAG_SORTED, HEADER_FLAG_SORTED);
        // Duplicate kept the higher frequency.
        assert_eq!(dict.lookup("hello").unwrap().frequency, 60000);
        // Flags column applied; words stored lowercased.
        assert_eq!(dict.lookup("world").unwrap().flags, FLAG_PROPER_NOUN);
        assert_eq!(dict.lookup("damn").unwrap().flags, FLAG_PROFANITY);
    }

    #[test]
    fn proper_noun_marking_from_capitalization() {
        let entries = read_tsv("Berlin\t1000\n", true);
        assert_eq!(entries[0].flags, FLAG_PROPER_NOUN);
        assert_eq!(entries[0].word, "berlin");
    }

    #[test]
    fn negative_and_oversized_values_are_normalized() {
        let entries = read_tsv("down\t-5\nup\t99999999999\n", false);
        assert_eq!(entries[0].frequency, 0);
        assert_eq!(entries[1].frequency, u32::MAX);
    }

    #[test]
    fn oversized_language_tag_is_rejected() {
        let entries = read_tsv("a\t1\n", false);
        assert!(encode(&entries, "x-much-too-long-language-tag", true).is_err());
    }
}
