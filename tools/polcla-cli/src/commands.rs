use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, ValueEnum};
use polcla_lexicon::Lexicons;
use polcla_parser::{parse_lexicons, read_conll, read_preset_expressions, read_trees};
use polcla_protocol::{AnnotatorFlags, LexiconBundle, LexiconEntry, SentenceId, TreeSpec};
use polcla_resolver::SentenceAnnotator;
use tracing::{info, warn};

use crate::config::{AnnotatorConfig, Inputs};

#[derive(Args)]
pub struct AnnotateArgs {
    /// TOML file with annotator options
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Compiled lexicon archive, used instead of the flat lexicon files
    #[arg(long, value_name = "FILE")]
    pub archive: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    pub dependency: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    pub constituency: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    pub sentiment_lexicon: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    pub shifter_lexicon: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    pub intensifier_lexicon: Option<PathBuf>,

    /// Expression positions per sentence, used with use_preset_expressions
    #[arg(long, value_name = "FILE")]
    pub preset_expressions: Option<PathBuf>,

    /// JSON Lines output, stdout when omitted
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl AnnotateArgs {
    fn inputs(&self) -> Inputs {
        Inputs {
            dependency: self.dependency.clone(),
            constituency: self.constituency.clone(),
            sentiment_lexicon: self.sentiment_lexicon.clone(),
            shifter_lexicon: self.shifter_lexicon.clone(),
            intensifier_lexicon: self.intensifier_lexicon.clone(),
            preset_expressions: self.preset_expressions.clone(),
            output: self.output.clone(),
        }
    }
}

#[derive(Args)]
pub struct CompileArgs {
    #[arg(long, value_name = "FILE")]
    pub sentiment_lexicon: PathBuf,

    #[arg(long, value_name = "FILE")]
    pub shifter_lexicon: PathBuf,

    #[arg(long, value_name = "FILE")]
    pub intensifier_lexicon: Option<PathBuf>,

    /// Options that shape the tables (neutral rows, MWE expansion)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LexiconKind {
    Sentiment,
    Shifter,
    Intensifier,
}

#[derive(Args)]
pub struct CheckArgs {
    #[arg(value_name = "FILE")]
    pub lexicon: PathBuf,

    #[arg(short, long, value_enum, default_value = "sentiment")]
    pub kind: LexiconKind,
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn required<'a>(path: &'a Option<PathBuf>, name: &str) -> Result<&'a Path> {
    path.as_deref()
        .ok_or_else(|| anyhow!("no {name} given (config [inputs] or --{})", name.replace('_', "-")))
}

fn load_config(path: Option<&Path>) -> Result<AnnotatorConfig> {
    let config = match path {
        Some(path) => AnnotatorConfig::load(path)?,
        None => AnnotatorConfig::default(),
    };
    Ok(config)
}

fn load_lexicons(inputs: &Inputs, flags: AnnotatorFlags) -> Result<Lexicons> {
    let sentiment = read(required(&inputs.sentiment_lexicon, "sentiment_lexicon")?)?;
    let shifter = read(required(&inputs.shifter_lexicon, "shifter_lexicon")?)?;
    let intensifier = inputs.intensifier_lexicon.as_deref().map(read).transpose()?;
    Ok(parse_lexicons(&sentiment, &shifter, intensifier.as_deref(), flags))
}

fn load_archive(path: &Path) -> Result<Lexicons> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    // archived data must be aligned before validation
    let mut aligned = rkyv::AlignedVec::with_capacity(bytes.len());
    aligned.extend_from_slice(&bytes);
    let bundle: LexiconBundle = rkyv::from_bytes(&aligned)
        .map_err(|e| anyhow!("{}: invalid lexicon archive ({e:?})", path.display()))?;
    info!(version = bundle.version, "lexicon archive loaded");
    Ok(Lexicons::from_bundle(bundle))
}

/// Bracketed trees, one per line, or JSON Lines of `TreeSpec` for
/// `.json`/`.jsonl` files.
fn load_trees(path: &Path) -> Result<Vec<TreeSpec>> {
    let text = read(path)?;
    let json = matches!(path.extension().and_then(|e| e.to_str()), Some("json" | "jsonl"));
    if !json {
        return read_trees(&text).with_context(|| format!("parsing {}", path.display()));
    }

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("{}: line {}", path.display(), i + 1))
        })
        .collect()
}

pub fn annotate(args: AnnotateArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    config.inputs.override_with(args.inputs());
    config.validate()?;
    config.validate_inputs()?;

    let flags = config.to_flags();
    let lexicons = match &args.archive {
        Some(path) => load_archive(path)?,
        None => load_lexicons(&config.inputs, flags)?,
    };

    let dependency = required(&config.inputs.dependency, "dependency")?;
    let sentences = read_conll(&read(dependency)?);

    let mut trees: Vec<Option<TreeSpec>> = match &config.inputs.constituency {
        Some(path) => {
            let specs = load_trees(path)?;
            if specs.len() != sentences.len() {
                warn!(trees = specs.len(), sentences = sentences.len(), "tree count differs from sentence count");
            }
            specs.into_iter().map(Some).collect()
        }
        None => Vec::new(),
    };
    trees.resize(sentences.len(), None);

    let mut out: Box<dyn Write> = match &config.inputs.output {
        Some(path) => Box::new(BufWriter::new(
            fs::File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };

    let mut annotator = SentenceAnnotator::new(&lexicons, config.strategies(), flags);
    if config.use_preset_expressions {
        let path = required(&config.inputs.preset_expressions, "preset_expressions")?;
        let presets = read_preset_expressions(&read(path)?).with_context(|| format!("parsing {}", path.display()))?;
        if presets.len() != sentences.len() {
            warn!(presets = presets.len(), sentences = sentences.len(), "preset line count differs from sentence count");
        }
        annotator = annotator.with_presets(presets);
    }

    let mut failed = 0;
    for (i, (sentence, tree)) in sentences.iter().zip(trees).enumerate() {
        let id = SentenceId::new(i as u32 + 1);
        let record = annotator.annotate_conll(id, sentence, tree);
        if record.error.is_some() {
            failed += 1;
        }
        serde_json::to_writer(&mut out, &record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    info!(sentences = sentences.len(), failed, "corpus annotated");
    annotator.hits().log();
    Ok(())
}

pub fn compile(args: CompileArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let inputs = Inputs {
        sentiment_lexicon: Some(args.sentiment_lexicon),
        shifter_lexicon: Some(args.shifter_lexicon),
        intensifier_lexicon: args.intensifier_lexicon,
        ..Inputs::default()
    };
    let bundle = load_lexicons(&inputs, config.to_flags())?.to_bundle();

    let bytes = rkyv::to_bytes::<_, 1024>(&bundle).map_err(|e| anyhow!("serializing lexicons: {e:?}"))?;
    fs::write(&args.output, &bytes).with_context(|| format!("writing {}", args.output.display()))?;

    info!(
        sentiments = bundle.sentiments.len(),
        shifters = bundle.shifters.len(),
        bytes = bytes.len(),
        output = %args.output.display(),
        "lexicon archive written"
    );
    Ok(())
}

fn report<E: LexiconEntry>(kind: &str, entries: &[E]) {
    let mwes = entries.iter().filter(|e| e.is_mwe()).count();
    println!("{kind}: {} entries, {mwes} multi-word expressions", entries.len());
}

pub fn check(args: CheckArgs) -> Result<()> {
    let text = read(&args.lexicon)?;
    let flags = AnnotatorFlags::default();

    match args.kind {
        LexiconKind::Sentiment => {
            let lexicons = parse_lexicons(&text, "", None, flags);
            if lexicons.sentiments.is_empty() {
                bail!("{}: no sentiment entries", args.lexicon.display());
            }
            report("sentiment", lexicons.sentiments.entries());
        }
        LexiconKind::Shifter | LexiconKind::Intensifier => {
            let lexicons = parse_lexicons("", &text, None, flags);
            if lexicons.shifters.is_empty() {
                bail!("{}: no shifter entries", args.lexicon.display());
            }
            let kind = match args.kind {
                LexiconKind::Intensifier => "intensifier",
                _ => "shifter",
            };
            report(kind, lexicons.shifters.entries());
        }
    }
    Ok(())
}
