use crate::api::server as api_server;
use crate::cli::opts::*;

use anyhow::{bail, Result};
use std::path::PathBuf;
use std::sync::Arc;
use wundr_core::{
    chunk, confident_labels, derive_id, FlashcardStore, LabelGateway, ResolveOutcome,
    ResolveRequest, Resolver, SaveOutcome, Source,
};
use wundr_gateways::HttpGateway;
use wundr_json::paths::data_root;
use wundr_json::JsonStore;
use wundr_sqlite::SqliteStore;

pub async fn run_cli(args: Cli) -> Result<()> {
    let gateway = HttpGateway::new(&args.base_url)?;
    match &args.cmd {
        Command::Labels(cmd) => labels_cmd(gateway, cmd.clone()).await,
        Command::Api(api) => {
            let store = open_store(&args.store, args.db_path.clone()).await?;
            let resolver = Arc::new(build_resolver(store.clone(), &gateway, &args.native));
            let addr: std::net::SocketAddr = api.addr.parse()?;
            api_server::run(store, resolver, addr).await
        }
        _ => {
            let store = open_store(&args.store, args.db_path.clone()).await?;
            match args.cmd.clone() {
                Command::Resolve(cmd) => resolve_cmd(store, &gateway, &args.native, cmd).await,
                Command::Cards(cmd) => cards_cmd(store, cmd).await,
                _ => unreachable!(),
            }
        }
    }
}

pub async fn open_store(
    store: &StoreKind,
    db_path: Option<PathBuf>,
) -> Result<Arc<dyn FlashcardStore>> {
    match store {
        StoreKind::Json => match db_path {
            None => Ok(Arc::new(JsonStore::open_default().await?)),
            Some(p) => {
                let backups = p
                    .parent()
                    .unwrap_or_else(|| std::path::Path::new("."))
                    .join("backups");
                Ok(Arc::new(JsonStore::open_with(p, backups, 10).await?))
            }
        },
        StoreKind::Sqlite => {
            let p = db_path.unwrap_or_else(|| data_root().join("wundr.sqlite3"));
            if let Some(parent) = p.parent() {
                std::fs::create_dir_all(parent).ok();
            }
            let s = SqliteStore::open_file(&p).await?;
            Ok(Arc::new(s))
        }
    }
}

fn build_resolver(store: Arc<dyn FlashcardStore>, gateway: &HttpGateway, native: &str) -> Resolver {
    Resolver::new(store, Arc::new(gateway.clone()), Arc::new(gateway.clone())).with_native(native)
}

async fn labels_cmd(gateway: HttpGateway, cmd: LabelsCmd) -> Result<()> {
    let image = std::fs::read(&cmd.image)?;
    let labels = gateway.detect(&image, cmd.include_text).await?;
    let candidates = confident_labels(&labels);
    if candidates.is_empty() {
        println!("no candidate cleared the confidence threshold");
        return Ok(());
    }
    for l in candidates {
        println!("{}\t{:.2}", l.label, l.score);
    }
    Ok(())
}

async fn resolve_cmd(
    store: Arc<dyn FlashcardStore>,
    gateway: &HttpGateway,
    native: &str,
    cmd: ResolveCmd,
) -> Result<()> {
    let resolver = build_resolver(store, gateway, native);
    let req = ResolveRequest {
        object: cmd.object,
        target: cmd.target,
        level: cmd.level,
        image_uri: cmd.image_uri.unwrap_or_default(),
    };
    let resolution = match resolver.resolve(&req).await? {
        ResolveOutcome::Resolved(r) => r,
        ResolveOutcome::Superseded => bail!("resolution superseded"),
    };

    let card = &resolution.card;
    let origin = match resolution.source {
        Source::Cache => " [cached]",
        Source::Upstream => "",
    };
    println!(
        "{} → {} ({}, {}){origin}",
        card.object, card.translated, card.target, card.level
    );
    if resolution.translated_fallback {
        println!("note: translation unavailable, showing the source word");
    }
    if let Some(w) = &resolution.prompt_warning {
        println!("warning: prompts unavailable ({w})");
    }
    for (i, p) in card.prompts.iter().enumerate() {
        println!("{:>2}. {}", i + 1, p.l2);
        println!("    {}", p.l1);
    }

    if cmd.save {
        if !card.is_complete() {
            println!("not saved: card has no prompts, re-resolve and try again");
        } else {
            match resolver.save(card).await? {
                SaveOutcome::Saved => println!("saved {}", card.id),
                SaveOutcome::AlreadySaved => println!("already saved"),
            }
        }
    }
    Ok(())
}

async fn cards_cmd(store: Arc<dyn FlashcardStore>, cmd: CardsCmd) -> Result<()> {
    match cmd {
        CardsCmd::List { by_lang } => {
            if by_lang {
                let sections = store.list_grouped_by_target(true).await?;
                if sections.is_empty() {
                    println!("no flashcards yet");
                    return Ok(());
                }
                for (title, cards) in sections {
                    println!("{title}");
                    // Same three-tile rows the grid view shows.
                    for row in chunk(&cards, 3) {
                        let tiles: Vec<String> = row
                            .iter()
                            .map(|c| format!("{}={}", c.object, c.translated))
                            .collect();
                        println!("  {}", tiles.join("\t"));
                    }
                }
            } else {
                let mut cards = store.list().await?;
                cards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                for c in cards {
                    println!(
                        "{}\t{}\t{}\t{}\t{}",
                        c.id, c.object, c.translated, c.target, c.level
                    );
                }
            }
        }
        CardsCmd::Show {
            target,
            object,
            level,
        } => {
            let id = derive_id(&target, &object, level)?;
            match store.get(&id).await? {
                Some(c) => {
                    println!("{} → {} ({}, {})", c.object, c.translated, c.target, c.level);
                    if !c.image_uri.is_empty() {
                        println!("image: {}", c.image_uri);
                    }
                    for (i, p) in c.prompts.iter().enumerate() {
                        println!("{:>2}. {}", i + 1, p.l2);
                        println!("    {}", p.l1);
                    }
                }
                None => println!("not found"),
            }
        }
        CardsCmd::Rm {
            target,
            object,
            level,
        } => {
            let id = derive_id(&target, &object, level)?;
            store.delete(&id).await?;
            println!("ok");
        }
        CardsCmd::Clear => {
            store.clear().await?;
            println!("cleared");
        }
    }
    Ok(())
}
