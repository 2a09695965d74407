use anyhow::{bail, Context};
use clap::Parser;
use crossterm::style::Stylize;
use rhyme_core::config::first_existing;
use rhyme_core::loader::load_word_list;
use rhyme_core::{
    order_label, DictionaryPaths, Encoding, RhymeConfig, RhymeDict, RhymeSet, TracingSink,
};
use std::collections::HashMap;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// List known words that rhyme with the given words.
///
/// Without -d, the CMU dictionary is searched under $DATA_DIR (default
/// `data`). Without -D, /usr/share/dict/words and
/// /etc/dictionaries-common/words are tried; words missing from that list
/// are hidden unless --all is given.
#[derive(Debug, Parser)]
#[command(name = "rhyme", version)]
struct Args {
    /// Words to find rhymes for.
    #[arg(required = true)]
    words: Vec<String>,

    /// Path to the CMU pronunciation dictionary.
    #[arg(short = 'd', long = "cmudict", value_name = "PATH")]
    cmudict: Option<PathBuf>,

    /// Text file with allowable words, one per line.
    #[arg(short = 'D', long = "dict", value_name = "PATH")]
    dict: Option<PathBuf>,

    /// Do not load any word list.
    #[arg(long)]
    no_dict: bool,

    /// CMU dictionary encoding (utf-8 or latin-1).
    #[arg(short = 'e', long, default_value = "UTF-8")]
    encoding: String,

    /// Remove stress digits so rhymes may differ in stress (EH1 -> EH).
    #[arg(short = 'R', long)]
    remove_stresses: bool,

    /// Save the rhyming dictionary to PATH (.bin for a binary snapshot).
    #[arg(short = 'S', long, value_name = "PATH")]
    save: Option<PathBuf>,

    /// Load a saved rhyming dictionary instead of the CMU dictionary.
    #[arg(short = 'L', long, value_name = "PATH")]
    load: Option<PathBuf>,

    /// Include words not present in the word list.
    #[arg(short = 'a', long)]
    all: bool,

    /// Omit words spelled with a leading capital in the word list.
    #[arg(short = 'n', long)]
    no_capital: bool,

    /// Wrap output lines to at most N characters (-1 disables).
    #[arg(short = 'w', long, default_value_t = -1, allow_negative_numbers = true)]
    wrap: i64,

    /// Indent rhyming words by N spaces.
    #[arg(short = 'i', long, default_value_t = 4)]
    indent: usize,

    /// Separator between rhyming words.
    #[arg(short = 's', long, default_value = "  ")]
    sep: String,

    /// Dump summary statistics of the rhyming dictionary.
    #[arg(long)]
    inspect: bool,

    /// Report build and query timings.
    #[arg(long)]
    profile: bool,

    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Lays out one rhyme group: indented words joined by `sep`, wrapped so no
/// line exceeds `wrap` characters when `wrap` is set.
fn format_rhymes(words: &[String], indent: usize, sep: &str, wrap: Option<usize>) -> Vec<String> {
    let blank = " ".repeat(indent);
    let mut lines = Vec::new();
    let mut line = blank.clone();
    for (idx, word) in words.iter().enumerate() {
        if let Some(width) = wrap {
            if line != blank && line.len() + sep.len() + word.len() > width {
                lines.push(std::mem::replace(&mut line, blank.clone()));
            }
        }
        line.push_str(word);
        if idx + 1 < words.len() {
            line.push_str(sep);
        }
    }
    if line != blank {
        lines.push(line);
    }
    lines
}

fn starts_upper(word: &str) -> bool {
    word.starts_with(|c: char| c.is_uppercase())
}

/// Filters and re-cases rhymes through the word list, if one was loaded.
fn present(set: &RhymeSet, words: Option<&HashMap<String, String>>, args: &Args) -> Vec<String> {
    let Some(words) = words else {
        return set.words.clone();
    };
    set.words
        .iter()
        .filter_map(|word| match words.get(word) {
            Some(entry) if args.all || !(args.no_capital && starts_upper(entry)) => Some(entry.clone()),
            Some(_) => None,
            None if args.all => Some(word.clone()),
            None => None,
        })
        .collect()
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> anyhow::Result<bool> {
    let paths = DictionaryPaths::from_env();
    let config = RhymeConfig {
        encoding: args.encoding.parse::<Encoding>()?,
        remove_stresses: args.remove_stresses,
        ..RhymeConfig::default()
    };
    let sink = if args.profile { TracingSink::profiling() } else { TracingSink::new() };

    let cmu = first_existing(args.cmudict.as_deref(), &paths.cmu);
    if cmu.is_none() && args.load.is_none() {
        bail!("CMU dict not found; use -d,--cmudict");
    }
    let dict = RhymeDict::open(cmu.as_deref(), args.load.as_deref(), &config, &sink).map_err(|e| {
        if matches!(e, rhyme_core::RhymeError::Decode { .. }) {
            tracing::error!("use -e,--encoding to specify an encoding for the CMU dictionary");
        }
        e
    })?;

    let word_list = if args.no_dict {
        None
    } else {
        match first_existing(args.dict.as_deref(), &paths.word_lists) {
            Some(path) => Some(load_word_list(&path).with_context(|| format!("loading {}", path.display()))?),
            None => None,
        }
    };

    if args.inspect {
        for line in dict.inspect().to_string().lines() {
            tracing::info!("{}", line);
        }
    }
    if let Some(path) = &args.save {
        dict.save(path).with_context(|| format!("saving {}", path.display()))?;
    }

    let wrap = usize::try_from(args.wrap).ok();
    let styled = std::io::stdout().is_terminal();
    let mut all_found = true;
    for word in args.words.iter().map(|w| w.to_uppercase()) {
        if args.verbose {
            if let Ok(records) = dict.variant_records(&word) {
                for record in records {
                    tracing::debug!("{}: variant {}: {}", word, record.variant + 1, record.pronunciation);
                    for (order, key) in record.keys.iter() {
                        tracing::debug!("order {}: {}", order, key);
                    }
                }
            }
        }
        let sets = match dict.perfect_rhymes(&word, None, &sink) {
            Ok(sets) => sets,
            Err(e) => {
                tracing::error!("{}", e);
                all_found = false;
                continue;
            }
        };
        for set in &sets {
            let shown = present(set, word_list.as_ref(), args);
            tracing::debug!("{}: order={}: {:?}", word, set.order, shown);
            let heading = format!("{} ({})", word, order_label(set.order));
            if styled {
                println!("{}", heading.bold());
            } else {
                println!("{}", heading);
            }
            for line in format_rhymes(&shown, args.indent, &args.sep, wrap) {
                println!("{}", line);
            }
        }
        println!();
    }
    Ok(all_found)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
