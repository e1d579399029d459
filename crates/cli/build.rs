use std::{env, fs, path::PathBuf};

fn main() -> std::io::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        return Ok(());
    };
    let completions_dir = out_dir.join("completions");
    fs::create_dir_all(&completions_dir)?;

    let mut cmd = clap::Command::new("clipmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Turn social posts and web articles into clean text or Markdown")
        .arg(clap::arg!(<URL> "http(s) URL of a post or article"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (text, markdown, json)")
                .value_name("FORMAT")
                .default_value("markdown")
                .value_parser(["text", "markdown", "json"]),
        )
        .arg(clap::arg!(--timeout <SECS> "Overall deadline for the whole extraction in seconds").default_value("20"))
        .arg(clap::arg!(--"request-timeout" <SECS> "Timeout for each individual HTTP request in seconds").default_value("10"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for article pages").value_name("UA"))
        .arg(clap::arg!(--"api-base" <URL> "Base URL of the social mirror API").value_name("URL"))
        .arg(clap::arg!(--"page-base" <URL> "Base URL of the social mirror HTML pages").value_name("URL"))
        .arg(
            clap::arg!(--"char-threshold" <NUM> "Elements shorter than a tenth of this many characters are not scored")
                .default_value("500"),
        )
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "clipmark", &completions_dir)?;
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "clipmark", &completions_dir)?;
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "clipmark", &completions_dir)?;
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "clipmark", &completions_dir)?;

    println!("cargo:warning=Shell completions generated in: {}", completions_dir.display());
    Ok(())
}
