mod instagram_api;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use instagram_api::{InstagramClient, PostComment};
use socialscope::calendar::{normalize_hashtags, CalendarEvent, EventStore, NewEvent};
use socialscope::chat::Transcript;
use socialscope::config::{ApiConfig, AppConfig};
use socialscope::followers::{ghosts, parse_followers_csv, GhostReport};
use socialscope::ideas::{analyze_image, generate_ideas, niche_names};
use socialscope::metrics::{
    analyze_profile, average_engagement_rate, engagement_rate, fallback_trending_hashtags,
    format_hour, posting_heatmap, AnalyticsReport, EngagementTier, WEEKDAYS,
};
use socialscope::profile::resolve_seeded;
use socialscope::sentiment::{self, SentimentResult};
use socialscope::storage::{
    keys, toggle_dark_mode, FileBackend, KvStore, MemoryBackend, StorageBackend,
};
use socialscope::{
    format_float, format_number, format_rate, now_ms, MediaType, Post, PostMetrics, Profile,
};

const FETCH_FAILED_NOTICE: &str = "Failed to fetch Instagram data. Showing sample data instead.";

#[derive(Parser)]
#[command(name = "socialscope", about = "Instagram account analytics")]
struct Cli {
    /// Config file (defaults to SOCIALSCOPE_CONFIG_PATH or config/socialscope.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Keep state in memory for this run only.
    #[arg(long, global = true)]
    ephemeral: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch (or synthesize) a profile, cache it and print its analytics.
    Profile(ProfileArgs),
    /// Engagement calculator for hand-entered posts.
    Engagement(EngagementArgs),
    Sentiment(SentimentArgs),
    /// Score the comments on one post.
    Comments(CommentsArgs),
    #[command(subcommand)]
    Calendar(CalendarCommand),
    Ghosts(GhostsArgs),
    Chat(ChatArgs),
    Ideas(IdeasArgs),
    AnalyzeImage,
    /// Posting heatmap of the cached profile.
    Heatmap,
    Trending,
    /// Toggle the dark-mode preference.
    Theme,
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug)]
struct ProfileArgs {
    username: String,
    /// Skip the network and use the synthetic profile.
    #[arg(long)]
    offline: bool,
}

#[derive(Args, Debug)]
struct EngagementArgs {
    #[arg(long)]
    followers: u64,
    /// LIKES:COMMENTS, repeatable.
    #[arg(long = "post", required = true)]
    posts: Vec<String>,
}

#[derive(Args, Debug)]
struct SentimentArgs {
    #[arg(long)]
    text: Option<String>,
}

#[derive(Args, Debug)]
struct CommentsArgs {
    post_id: String,
}

#[derive(Subcommand)]
enum CalendarCommand {
    Add(CalendarAddArgs),
    List(CalendarListArgs),
}

#[derive(Args, Debug)]
struct CalendarAddArgs {
    #[arg(long)]
    date: String,
    #[arg(long)]
    time: Option<String>,
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    caption: String,
    /// Space-separated; a leading `#` is added where missing.
    #[arg(long)]
    hashtags: Option<String>,
    #[arg(long, default_value = "image")]
    media: String,
    #[arg(long)]
    media_url: Option<String>,
}

#[derive(Args, Debug)]
struct CalendarListArgs {
    #[arg(long)]
    date: Option<String>,
}

#[derive(Args, Debug)]
struct GhostsArgs {
    csv: PathBuf,
}

#[derive(Args, Debug)]
struct ChatArgs {
    message: String,
}

#[derive(Args, Debug)]
struct IdeasArgs {
    niche: String,
}

#[derive(Args, Debug)]
struct InitConfigArgs {
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "socialscope=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (config, config_path) = AppConfig::load(cli.config)?;

    if cli.ephemeral {
        let store = KvStore::open(MemoryBackend::new())
            .await
            .map_err(|err| err.to_string())?;
        run_command(cli.command, &config, config_path.as_deref(), &store).await
    } else {
        let store = KvStore::open(FileBackend::new(config.storage.path.clone()))
            .await
            .map_err(|err| err.to_string())?;
        run_command(cli.command, &config, config_path.as_deref(), &store).await
    }
}

async fn run_command<B: StorageBackend>(
    command: Command,
    config: &AppConfig,
    config_path: Option<&Path>,
    store: &KvStore<B>,
) -> Result<(), String> {
    match command {
        Command::Profile(args) => run_profile(args, config, store).await,
        Command::Engagement(args) => run_engagement(args),
        Command::Sentiment(args) => {
            let text = read_text(args.text)?;
            print_sentiment(&sentiment::analyze(&text));
            Ok(())
        }
        Command::Comments(args) => run_comments(args, &config.api).await,
        Command::Calendar(CalendarCommand::Add(args)) => run_calendar_add(args, store).await,
        Command::Calendar(CalendarCommand::List(args)) => run_calendar_list(args, store).await,
        Command::Ghosts(args) => run_ghosts(&args.csv).await,
        Command::Chat(args) => run_chat(args, store).await,
        Command::Ideas(args) => run_ideas(args, config).await,
        Command::AnalyzeImage => {
            let analysis = analyze_image(config.simulated_latency()).await;
            println!("Mood: {}", analysis.mood);
            println!("Colors: {}", analysis.colors.join(" "));
            println!("Hashtags: {}", analysis.hashtags.join(" "));
            println!("\nCaptions:");
            for caption in analysis.captions {
                println!("- {}", caption);
            }
            Ok(())
        }
        Command::Heatmap => run_heatmap(store).await,
        Command::Trending => run_trending(&config.api).await,
        Command::Theme => {
            let dark = toggle_dark_mode(store)
                .await
                .map_err(|err| err.to_string())?;
            println!("Theme: {}", if dark { "dark" } else { "light" });
            Ok(())
        }
        Command::InitConfig(args) => {
            let path = config_path.ok_or_else(|| "no config path available".to_string())?;
            run_init_config(path, args.force)
        }
    }
}

async fn run_profile<B: StorageBackend>(
    args: ProfileArgs,
    config: &AppConfig,
    store: &KvStore<B>,
) -> Result<(), String> {
    let username = args.username.trim().trim_start_matches('@');
    if username.is_empty() {
        return Err("username is required".to_string());
    }

    let upstream = if args.offline {
        None
    } else {
        fetch_upstream(&config.api, username).await
    };
    let profile = resolve_seeded(username, upstream.as_ref(), config.fallback.seed);
    store
        .set(keys::PROFILE, &profile)
        .await
        .map_err(|err| err.to_string())?;

    print_profile(&profile);
    print_report(&analyze_profile(&profile));
    Ok(())
}

async fn fetch_upstream(api: &ApiConfig, username: &str) -> Option<Value> {
    let client = match InstagramClient::from_config(api) {
        Ok(Some(client)) => client,
        Ok(None) => {
            info!("RAPIDAPI_KEY is not set, using sample data");
            return None;
        }
        Err(err) => {
            warn!(error = %err, "instagram client unavailable");
            eprintln!("{}", FETCH_FAILED_NOTICE);
            return None;
        }
    };

    match client.fetch_profile(username).await {
        Ok(payload) => Some(payload),
        Err(err) => {
            warn!(username, error = %err, "profile fetch failed");
            eprintln!("{}", FETCH_FAILED_NOTICE);
            None
        }
    }
}

fn run_engagement(args: EngagementArgs) -> Result<(), String> {
    let posts = args
        .posts
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            parse_post_counts(raw).map(|(likes, comments)| manual_post(idx, likes, comments))
        })
        .collect::<Result<Vec<_>, _>>()?;

    for post in &posts {
        println!(
            "Post {}: {} likes | {} comments | {}",
            post.id,
            format_number(post.likes as f64),
            format_number(post.comments as f64),
            engagement_rate(post.likes, post.comments, args.followers)
        );
    }

    let average = average_engagement_rate(&posts, args.followers);
    println!(
        "Average engagement rate: {} ({})",
        format_rate(average),
        EngagementTier::from_rate(average).label()
    );
    Ok(())
}

fn parse_post_counts(raw: &str) -> Result<(u64, u64), String> {
    let (likes, comments) = raw
        .split_once(':')
        .ok_or_else(|| format!("invalid post (LIKES:COMMENTS): {}", raw))?;
    let likes = likes
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("invalid likes in post: {}", raw))?;
    let comments = comments
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("invalid comments in post: {}", raw))?;
    Ok((likes, comments))
}

fn manual_post(idx: usize, likes: u64, comments: u64) -> Post {
    Post::new(
        (idx + 1).to_string(),
        String::new(),
        String::new(),
        false,
        now_ms(),
        PostMetrics {
            likes,
            comments,
            ..PostMetrics::default()
        },
    )
}

async fn run_comments(args: CommentsArgs, api: &ApiConfig) -> Result<(), String> {
    let client = InstagramClient::from_config(api)?;
    let comments = post_comments(client.as_ref(), &args.post_id).await;
    if comments.is_empty() {
        println!("No comments found.");
        return Ok(());
    }

    let mut counts = [0usize; 3];
    for comment in &comments {
        let result = sentiment::analyze(&comment.text);
        let slot = match result.sentiment {
            sentiment::Sentiment::Positive => 0,
            sentiment::Sentiment::Negative => 1,
            sentiment::Sentiment::Neutral => 2,
        };
        counts[slot] += 1;
        println!(
            "[{}] @{} ({} likes): {}",
            result.sentiment.label(),
            comment.username,
            format_number(comment.likes as f64),
            comment.text
        );
    }
    println!(
        "\nPositive {} | Negative {} | Neutral {}",
        counts[0], counts[1], counts[2]
    );
    Ok(())
}

async fn post_comments(client: Option<&InstagramClient>, post_id: &str) -> Vec<PostComment> {
    let Some(client) = client else {
        debug!(post_id, "no API key, skipping comment fetch");
        return Vec::new();
    };
    match client.fetch_post_comments(post_id).await {
        Ok(comments) => comments,
        Err(err) => {
            warn!(post_id, error = %err, "comment fetch failed");
            Vec::new()
        }
    }
}

async fn run_calendar_add<B: StorageBackend>(
    args: CalendarAddArgs,
    store: &KvStore<B>,
) -> Result<(), String> {
    let media_type = MediaType::from_str(&args.media)
        .ok_or_else(|| format!("invalid media type: {}", args.media))?;
    let draft = NewEvent {
        time: args.time,
        caption: args.caption,
        hashtags: args
            .hashtags
            .as_deref()
            .map(normalize_hashtags)
            .unwrap_or_default(),
        media_type,
        media_url: args.media_url,
        ..NewEvent::new(args.date, args.title)
    };

    let mut events = EventStore::load(store).await;
    let event = events.add(draft, now_ms())?;
    events.save(store).await.map_err(|err| err.to_string())?;

    println!("Added draft {}", event.id);
    print_event(&event);
    Ok(())
}

async fn run_calendar_list<B: StorageBackend>(
    args: CalendarListArgs,
    store: &KvStore<B>,
) -> Result<(), String> {
    let events = EventStore::load(store).await;
    let listed = match args.date.as_deref() {
        Some(date) => events.list_by_date(date.trim()),
        None => events.list_sorted_by_recency(),
    };
    if listed.is_empty() {
        println!("No events scheduled.");
        return Ok(());
    }
    for event in listed {
        print_event(event);
    }
    Ok(())
}

async fn run_ghosts(path: &Path) -> Result<(), String> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| format!("failed to read {}: {}", path.display(), err))?;
    let followers = parse_followers_csv(&text);
    let report = GhostReport::from_followers(&followers);

    println!(
        "Followers: {} | ghosts {} | active {} ({} ghost)",
        report.total,
        report.ghosts,
        report.active,
        format_rate(report.ghost_ratio() * 100.0)
    );
    for follower in ghosts(&followers) {
        println!("- {}", follower.username);
    }
    Ok(())
}

async fn run_chat<B: StorageBackend>(args: ChatArgs, store: &KvStore<B>) -> Result<(), String> {
    let profile = cached_profile(store).await;
    let mut transcript = Transcript::load(store, now_ms()).await;
    let Some(answer) = transcript.send(&args.message, profile.as_ref(), now_ms()) else {
        return Err("message is empty".to_string());
    };
    println!("{}", answer.text);
    transcript.save(store).await.map_err(|err| err.to_string())
}

async fn run_ideas(args: IdeasArgs, config: &AppConfig) -> Result<(), String> {
    let niche = generate_ideas(&args.niche, config.simulated_latency())
        .await
        .ok_or_else(|| {
            format!(
                "unknown niche: {} (choose from {})",
                args.niche,
                niche_names().collect::<Vec<_>>().join(", ")
            )
        })?;

    for idea in niche.ideas {
        println!("{}: {}", idea.title, idea.description);
        println!("  {}", idea.caption);
        println!("  {}", idea.hashtags.join(" "));
    }
    println!("\nNiche hashtags: {}", niche.hashtags.join(" "));
    Ok(())
}

async fn run_heatmap<B: StorageBackend>(store: &KvStore<B>) -> Result<(), String> {
    let profile = cached_profile(store).await.ok_or_else(|| {
        "no cached profile: run `socialscope profile <username>` first".to_string()
    })?;
    let heatmap = posting_heatmap(&profile.recent_posts);

    print!("{:<10}", "");
    for hour in (0..24).step_by(3) {
        print!("{:<6}", format_hour(hour));
    }
    println!();
    for (weekday, name) in WEEKDAYS.iter().enumerate() {
        let cells: String = (0..24)
            .map(|hour| match heatmap.intensity(weekday, hour) {
                0 => '.',
                level => char::from_digit(level.min(9), 10).unwrap_or('#'),
            })
            .flat_map(|cell| [cell, ' '])
            .collect();
        println!("{:<10}{}", name, cells);
    }
    println!("Posts: {} | busiest slot: {}", heatmap.total(), heatmap.max());
    Ok(())
}

async fn run_trending(api: &ApiConfig) -> Result<(), String> {
    let fetched = match InstagramClient::from_config(api)? {
        Some(client) => match client.fetch_trending_hashtags().await {
            Ok(tags) => Some(tags),
            Err(err) => {
                warn!(error = %err, "trending hashtag fetch failed");
                None
            }
        },
        None => None,
    };
    let tags = fetched.unwrap_or_else(fallback_trending_hashtags);
    for tag in tags {
        println!("{:<16} {}", tag.tag, format_number(tag.count as f64));
    }
    Ok(())
}

fn run_init_config(path: &Path, force: bool) -> Result<(), String> {
    if path.exists() && !force {
        return Err(format!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        ));
    }
    AppConfig::default().write(path)?;
    println!("Wrote config to {}", path.display());
    Ok(())
}

async fn cached_profile<B: StorageBackend>(store: &KvStore<B>) -> Option<Profile> {
    store.get(keys::PROFILE, None).await
}

fn print_profile(profile: &Profile) {
    println!(
        "@{}{}",
        profile.username,
        if profile.is_private { " (private)" } else { "" }
    );
    println!(
        "Followers: {} | Following: {} | Posts: {}",
        format_number(profile.followers as f64),
        format_number(profile.following as f64),
        format_number(profile.posts as f64)
    );
    println!(
        "Engagement rate: {} ({})",
        profile.engagement_rate,
        EngagementTier::from_formatted(&profile.engagement_rate).label()
    );
}

fn print_report(report: &AnalyticsReport) {
    println!("\nEngagement by post:");
    for point in &report.engagement_series {
        println!(
            "  {}  {} (likes {} | comments {})",
            point.date,
            format_number(point.engagement as f64),
            format_number(point.likes as f64),
            format_number(point.comments as f64)
        );
    }

    let mix = report
        .content_mix
        .entries()
        .iter()
        .map(|(media, count)| format!("{} {}", media.label(), count))
        .collect::<Vec<_>>();
    println!("\nContent mix: {}", mix.join(" | "));

    let slots = report
        .best_times
        .iter()
        .map(|slot| format!("{} ({})", slot.label(), format_number(slot.engagement as f64)))
        .collect::<Vec<_>>();
    println!("Best times: {}", slots.join(", "));

    println!(
        "Average post engagement: {} ({})",
        format_rate(report.average_engagement_rate),
        report.tier.label()
    );

    if !report.top_hashtags.is_empty() {
        println!("\nTop hashtags:");
        for stat in &report.top_hashtags {
            println!(
                "  {:<16} used {} | avg engagement {}",
                stat.tag,
                stat.uses,
                format_float(stat.average_engagement(), 1)
            );
        }
    }
}

fn print_sentiment(result: &SentimentResult) {
    println!(
        "Sentiment: {} (score {}/10)",
        result.sentiment.label(),
        result.normalized_score
    );
    if !result.keywords.is_empty() {
        println!("Keywords: {}", result.keywords.join(", "));
    }
    println!("\nTips:");
    for tip in &result.tips {
        println!("- {}", tip);
    }
    println!("\nCaption ideas:");
    for caption in &result.caption_suggestions {
        println!("- {}", caption);
    }
}

fn print_event(event: &CalendarEvent) {
    println!(
        "{} {} [{}] {} ({})",
        event.date,
        event.time,
        event.status.label(),
        event.title,
        event.media_type.label()
    );
    if !event.caption.is_empty() {
        println!("    {}", event.caption);
    }
    if !event.hashtags.is_empty() {
        println!("    {}", event.hashtags.join(" "));
    }
}

fn read_text(arg: Option<String>) -> Result<String, String> {
    if let Some(text) = arg {
        if !text.trim().is_empty() {
            return Ok(text);
        }
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("failed reading stdin: {}", err))?;
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Err("missing text: pass --text or pipe stdin".to_string());
    }
    Ok(trimmed.to_string())
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
