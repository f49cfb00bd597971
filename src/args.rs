use clap::Parser;

/// Convert images, audio and video between formats, package videos as HLS
/// and extract thumbnails.
#[derive(Debug, Clone, Parser)]
#[command(
    version,
    about,
    override_usage = "uniconvert <INPUT> <OUTPUT> [-k]\n       uniconvert <FOLDER>/:<GROUP-OR-EXT> <OUTPUT> [-k]\n       uniconvert --filetypes\n       uniconvert --upgrade"
)]
pub struct Args {
    /// Input file, or folder joined with a `/:<group-or-ext>` selector.
    #[arg(value_name = "INPUT")]
    pub input: Option<String>,

    /// Selector continuation (when the shell splits the `/:<sel>` form)
    /// followed by the output filetype, e.g. jpg, mp3, m3u8 or thumbnail.
    #[arg(value_name = "OUTPUT")]
    pub rest: Vec<String>,

    /// Keep original files after a successful conversion.
    #[arg(short, long)]
    pub keep_original: bool,

    /// List supported filetype groups and extensions.
    #[arg(long, visible_alias = "ft")]
    pub filetypes: bool,

    /// Replace this executable with the latest published release.
    #[arg(short, long)]
    pub upgrade: bool,
}

pub fn parse() -> Args {
    Args::parse_from(rewrite(std::env::args()))
}

/// clap shorts are single characters; the historical `-ft` spelling is
/// rewritten to the long form before parsing.
fn rewrite(args: impl Iterator<Item = String>) -> Vec<String> {
    args.map(|arg| match arg.as_str() {
        "-ft" => "--filetypes".to_owned(),
        _ => arg,
    })
    .collect()
}
