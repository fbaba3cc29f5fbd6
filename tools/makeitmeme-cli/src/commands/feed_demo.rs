//! Publish to and observe an in-process feed.

use std::sync::Arc;
use std::time::Duration;

use chrono::Offset;
use makeitmeme_common::clock::SystemClock;
use makeitmeme_common::config::AppConfig;
use makeitmeme_feed_model::{Identity, TopicView};
use makeitmeme_feed_sync::{FeedSynchronizer, FeedUpdate, Subscription};
use makeitmeme_host_core::AuthProvider;
use makeitmeme_host_local::{InMemoryAuthProvider, InMemoryRemoteLog};

const SNAPSHOT_WAIT: Duration = Duration::from_secs(2);

pub async fn run(config: &AppConfig, messages: Vec<String>) -> anyhow::Result<()> {
    let auth = InMemoryAuthProvider::new();
    let me = auth.sign_up("me@example.com", "correct horse").await?;
    let friend = auth.sign_up("friend@example.com", "battery staple").await?;

    let log = Arc::new(InMemoryRemoteLog::new());
    let feed = FeedSynchronizer::new(log, Arc::new(SystemClock));
    let topic = config.feed.messages_topic.as_str();
    let reactions_topic = config.feed.reactions_topic.as_str();

    let mut messages_sub = feed.subscribe(topic).await?;
    let mut reactions_sub = feed.subscribe(reactions_topic).await?;
    next_view(&mut messages_sub).await?;
    next_view(&mut reactions_sub).await?;

    for (i, text) in messages.iter().enumerate() {
        let author = if i % 2 == 0 { &me } else { &friend };
        match feed.publish_message(topic, author, text).await {
            Ok(_) => {
                next_view(&mut messages_sub).await?;
            }
            Err(e) => println!("Skipped {text:?}: {e}"),
        }
    }

    let view = feed
        .view(topic)
        .ok_or_else(|| anyhow::anyhow!("not subscribed to {topic}"))?;
    if let Some(last) = view.events.last() {
        feed.publish_reaction(reactions_topic, &friend, Some(last.id.as_str()))
            .await?;
        next_view(&mut reactions_sub).await?;
    }
    let reactions = feed.view(reactions_topic).unwrap_or_default();

    print_feed(&view, &reactions, &me);

    feed.unsubscribe(messages_sub.handle());
    feed.unsubscribe(reactions_sub.handle());
    Ok(())
}

async fn next_view(sub: &mut Subscription) -> anyhow::Result<Arc<TopicView>> {
    match tokio::time::timeout(SNAPSHOT_WAIT, sub.recv()).await {
        Ok(Some(FeedUpdate::Snapshot(view))) => Ok(view),
        Ok(Some(FeedUpdate::Failed(e))) => Err(e.into()),
        Ok(None) => anyhow::bail!("subscription to {} ended", sub.topic()),
        Err(_) => anyhow::bail!("no snapshot for {} within {SNAPSHOT_WAIT:?}", sub.topic()),
    }
}

fn print_feed(view: &TopicView, reactions: &TopicView, me: &Identity) {
    let offset = chrono::Local::now().offset().fix();
    println!("Feed ({} messages):", view.events.len());
    for event in view.events.iter() {
        let who = if event.is_authored_by(me) {
            "me".to_string()
        } else {
            event.author.split('@').next().unwrap_or_default().to_string()
        };
        let likes = reactions.reaction_count(&event.id);
        let likes = if likes > 0 {
            format!("  [{likes} like(s)]")
        } else {
            String::new()
        };
        println!(
            "  {} {:>8}: {}{}",
            event.display_time(offset),
            who,
            event.payload.summary(),
            likes
        );
    }
}
