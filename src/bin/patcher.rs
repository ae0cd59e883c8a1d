use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use waymark::app_config::AppConfig;
use waymark::patcher::{LocalBackend, Shell, Status, Tone};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::WARN).init();

    let config = AppConfig::load();
    let backend = LocalBackend::new(config.patcher())?;
    let mut shell = Shell::new(backend);

    println!("{} patcher v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    shell.auto_detect().await;
    render(&mut shell);
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        let (command, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (trimmed, ""),
        };

        match command {
            "" => continue,
            "detect" => shell.auto_detect().await,
            "browse" => shell.browse().await,
            "status" => shell.refresh_status().await,
            "patch" if shell.can_patch() => shell.patch().await,
            "patch" => println!("Already patched; run 'unpatch' first."),
            "unpatch" if shell.can_unpatch() => shell.unpatch().await,
            "unpatch" => println!("Nothing to restore; run 'patch' first."),
            "path" if !rest.is_empty() => {
                shell.set_resources_path(Some(rest.to_string()));
                shell.refresh_status().await;
            }
            "devtools" => shell.set_enable_devtools(rest == "on"),
            "open" if !rest.is_empty() => shell.open_url(rest).await,
            "quit" | "exit" => {
                shell.close().await;
                render(&mut shell);
                break;
            }
            _ => print_help(),
        }

        render(&mut shell);
    }

    info!("Bye");
    Ok(())
}

fn render<B: waymark::patcher::Backend>(shell: &mut Shell<B>) {
    for entry in shell.take_log() {
        println!("{entry}");
    }

    let status = shell.status();
    let color = match status.tone() {
        Tone::Success => "\x1b[32m",
        Tone::Danger => "\x1b[31m",
        Tone::Neutral => "\x1b[36m",
    };
    let path = shell.resources_path().unwrap_or("<not set>");
    println!("{color}● {}\x1b[0m  {}", status.label(), path);

    if status == Status::Patched {
        println!("  available: unpatch");
    } else {
        println!("  available: patch");
    }
}

fn print_help() {
    println!("commands: detect | browse | status | patch | unpatch | path <dir> | devtools on|off | open <url> | quit");
}
