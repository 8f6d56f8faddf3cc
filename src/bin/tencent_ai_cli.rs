//! tencent-ai-cli — 腾讯 AI 图片特效与文本翻译命令行工具
//!
//! Usage:
//!   tencent-ai-cli trans <text> [--type <n>]                 Translate text
//!   tencent-ai-cli <effect> <template> <image> [--out <p>]   Apply an image effect
//!   tencent-ai-cli face-age <image> [--out <p>]              Render an age estimate

use anyhow::{bail, Context};
use std::path::PathBuf;
use tencent_ai::{blocking, image, ClientConfig, Endpoint, ImageResult, TranslationType};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "trans" => cmd_trans(&args[2..]),
        "face-age" => cmd_face_age(&args[2..]),
        "version" | "--version" | "-V" => {
            println!("tencent-ai-cli {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => match Endpoint::from_name(other) {
            Some(endpoint) if endpoint.template_param().is_some() => {
                cmd_effect(endpoint, &args[2..])
            }
            _ => {
                eprintln!("Unknown command: {other}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"tencent-ai-cli — 腾讯 AI 命令行工具

USAGE:
    tencent-ai-cli <COMMAND> [OPTIONS]

COMMANDS:
    trans <text> [--type <n>]             Translate text (type 0 = auto-detect)
    face-merge <template> <image>         Merge a face into a template
    face-cosmetic <template> <image>      Apply a makeup template
    face-decoration <template> <image>    Apply a decoration template
    img-filter <template> <image>         Apply an image filter
    face-sticker <template> <image>       Apply a sticker template
    face-age <image>                      Render an age estimate
    version                               Show version information
    help                                  Show this help message

OPTIONS:
    --config <path>                       YAML config file
    --out <path>                          Output image path (default: out.jpg)
    --debug                               Log requests and responses

ENVIRONMENT:
    TENCENT_AI_APP_ID, TENCENT_AI_APP_KEY Credentials
    TENCENT_AI_TIMEOUT_SECS               Request timeout
    RUST_LOG                              Log filter, e.g. tencent_ai=debug"#
    );
}

/// Positional arguments with `--flag value` pairs and `--debug` removed.
fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "--out" | "--type" => {
                iter.next();
            }
            "--debug" => {}
            other => out.push(other),
        }
    }
    out
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn client(args: &[String]) -> anyhow::Result<blocking::Client> {
    let mut config = match flag(args, "--config") {
        Some(path) => ClientConfig::from_yaml_file(path)
            .with_context(|| format!("cannot load config {path}"))?,
        None => ClientConfig::default(),
    };
    config.apply_env();
    if args.iter().any(|a| a == "--debug") {
        config.debug = true;
    }
    Ok(blocking::Client::new(config)?)
}

fn write_image(args: &[String], result: &ImageResult) -> anyhow::Result<()> {
    let out = PathBuf::from(flag(args, "--out").unwrap_or("out.jpg"));
    let bytes = result.decode()?;
    std::fs::write(&out, &bytes).with_context(|| format!("cannot write {}", out.display()))?;
    println!("Wrote {} ({} bytes)", out.display(), bytes.len());
    Ok(())
}

fn cmd_trans(args: &[String]) -> anyhow::Result<()> {
    let pos = positional(args);
    let Some(text) = pos.first() else {
        bail!("usage: tencent-ai-cli trans <text> [--type <n>]");
    };
    let kind = match flag(args, "--type") {
        Some(t) => TranslationType::from(
            t.parse::<u32>()
                .with_context(|| format!("invalid --type {t}"))?,
        ),
        None => TranslationType::AutoDetect,
    };
    let translated = client(args)?.text_trans(text, kind)?;
    println!("{translated}");
    Ok(())
}

fn cmd_effect(endpoint: Endpoint, args: &[String]) -> anyhow::Result<()> {
    let pos = positional(args);
    let [template, path] = pos.as_slice() else {
        bail!("usage: tencent-ai-cli {endpoint} <template> <image>");
    };
    let encoded = image::encode_file(path).with_context(|| format!("cannot read {path}"))?;
    let client = client(args)?;
    let result = match endpoint {
        Endpoint::FaceMerge => client.face_merge(template, &encoded),
        Endpoint::FaceCosmetic => client.face_cosmetic(template, &encoded),
        Endpoint::FaceDecoration => client.face_decoration(template, &encoded),
        Endpoint::ImgFilter => client.img_filter(template, &encoded),
        Endpoint::FaceSticker => client.face_sticker(template, &encoded),
        Endpoint::FaceAge | Endpoint::TextTrans => bail!("{endpoint} takes no template"),
    }?;
    write_image(args, &result)
}

fn cmd_face_age(args: &[String]) -> anyhow::Result<()> {
    let pos = positional(args);
    let [path] = pos.as_slice() else {
        bail!("usage: tencent-ai-cli face-age <image>");
    };
    let encoded = image::encode_file(path).with_context(|| format!("cannot read {path}"))?;
    let result = client(args)?.face_age(&encoded)?;
    write_image(args, &result)
}
