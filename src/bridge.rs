//! Event routing between the chat transport, the game feed and the bot.
//!
//! The bridge is transport-agnostic: each event handler returns the lines to
//! send and the caller writes them out.

use crate::commands::{ChatLine, CommandDispatcher, CommandRegistry, builtin};
use crate::config::{Config, ScoringConfig};
use crate::data::DataLookupDispatcher;
use crate::dex::Dex;
use crate::error::{ScoringError, TransportError};
use crate::markup::MarkupTranslator;
use crate::outbound::{LineSink, OutboundLine, Outbox};
use crate::scoring::{BattleLine, MatchScoring, NoopScoreStore, ScoreStore, Side, Winner};
use crate::telemetry::spans;
use crate::transport::{Command, FeedReader, IrcClient, IrcEvent};
use futures_util::future::OptionFuture;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{Instrument, debug, info, warn};

pub struct Bridge {
    dispatcher: CommandDispatcher,
    translator: MarkupTranslator,
    channel: String,
    nickname: String,
    scores: Arc<dyn ScoreStore>,
    victory_points: f64,
}

impl Bridge {
    pub fn new(
        dispatcher: CommandDispatcher,
        translator: MarkupTranslator,
        channel: &str,
        nickname: &str,
    ) -> Self {
        Self {
            dispatcher,
            translator,
            channel: channel.to_string(),
            nickname: nickname.to_string(),
            scores: Arc::new(NoopScoreStore),
            victory_points: ScoringConfig::default().victory_points,
        }
    }

    /// Send end-of-match totals to `scores` instead of discarding them.
    pub fn with_score_store(mut self, scores: Arc<dyn ScoreStore>) -> Self {
        self.scores = scores;
        self
    }

    /// Wire up the built-in commands over `dex` using the loaded config.
    pub fn from_config(config: &Config, dex: Arc<dyn Dex>) -> Self {
        let data = DataLookupDispatcher::new(dex);
        let builder = CommandRegistry::builder().max_hops(config.commands.max_alias_hops);
        let registry = builtin::register(builder, data.clone()).build();
        info!(commands = registry.names().len(), "Command registry built");

        let dispatcher = CommandDispatcher::new(registry, data.clone(), &config.commands);
        let mut bridge = Self::new(
            dispatcher,
            MarkupTranslator::new(data),
            &config.irc.channel,
            &config.irc.nickname,
        );
        bridge.victory_points = config.scoring.victory_points;
        bridge
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn score_store(&self) -> &dyn ScoreStore {
        &*self.scores
    }

    /// Scoring state for a new match, using the configured victory award.
    pub fn new_match(&self, p1: Side, p2: Side) -> MatchScoring {
        MatchScoring::new(p1, p2, self.victory_points)
    }

    /// End `scoring` with `winner`, commit the totals to the score store and
    /// return the match output for the channel.
    pub async fn finish_match<'w>(
        &self,
        scoring: &mut MatchScoring,
        winner: impl Into<Winner<'w>>,
    ) -> Result<Vec<OutboundLine>, ScoringError> {
        scoring.win(winner, self.score_store()).await?;
        Ok(self.on_battle_lines(scoring.drain_log()))
    }

    /// Inbound chat message. The bot's own messages are ignored.
    pub fn on_message(&self, line: &ChatLine) -> Vec<OutboundLine> {
        if line.sender.eq_ignore_ascii_case(&self.nickname) {
            return Vec::new();
        }
        let mut out = Outbox::new();
        self.dispatcher.dispatch(line, &mut out);
        out.drain()
    }

    /// One game feed line, relayed to the channel.
    pub fn on_feed_line(&self, line: &str) -> Vec<OutboundLine> {
        let mut out = Outbox::new();
        for text in self.translator.translate_lines(line) {
            out.send(&self.channel, &text);
        }
        if out.is_empty() {
            debug!(line = %line, "Feed line produced no output");
        }
        out.drain()
    }

    /// Scoring output, relayed to the channel as plain chat text.
    pub fn on_battle_lines(
        &self,
        lines: impl IntoIterator<Item = BattleLine>,
    ) -> Vec<OutboundLine> {
        let mut out = Outbox::new();
        for text in lines.into_iter().filter_map(|l| l.chat_text()) {
            out.send(&self.channel, &text);
        }
        out.drain()
    }
}

impl Bridge {
    /// Connect to the chat server (and the feed, if configured) and relay
    /// until the server closes the connection.
    ///
    /// An unreachable or failed feed is logged and the bot keeps answering
    /// commands without it.
    pub async fn run(&self, config: &Config) -> Result<(), TransportError> {
        let irc = IrcClient::connect(&config.irc).await?;

        let feed = match &config.feed {
            Some(feed) => match FeedReader::connect(&feed.address)
                .instrument(spans::feed(&feed.address))
                .await
            {
                Ok(reader) => Some(reader),
                Err(e) => {
                    warn!(address = %feed.address, error = %e, "Game feed unavailable");
                    None
                }
            },
            None => None,
        };

        self.serve(irc, feed).await
    }

    /// Event loop over an already registered connection.
    pub async fn serve<S, R>(
        &self,
        mut irc: IrcClient<S>,
        mut feed: Option<FeedReader<R>>,
    ) -> Result<(), TransportError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
        R: AsyncRead + Unpin,
    {
        loop {
            let feed_line: OptionFuture<_> = feed.as_mut().map(|f| f.next_line()).into();

            tokio::select! {
                event = irc.next_event() => {
                    let out = match event {
                        Ok(IrcEvent::Ping(token)) => {
                            irc.send(&Command::Pong(token)).await?;
                            continue;
                        }
                        Ok(IrcEvent::Welcome) => {
                            info!(channel = %self.channel, "Registered, joining channel");
                            irc.send(&Command::Join(self.channel.clone())).await?;
                            continue;
                        }
                        Ok(IrcEvent::Privmsg(line)) => self.on_message(&line),
                        Ok(IrcEvent::Other) => continue,
                        Err(TransportError::Closed) => {
                            info!("Chat server closed the connection");
                            return Ok(());
                        }
                        Err(e) => return Err(e),
                    };
                    send_all(&mut irc, out).await?;
                }
                Some(line) = feed_line => {
                    match line {
                        Ok(Some(line)) => {
                            let out = self.on_feed_line(&line);
                            send_all(&mut irc, out).await?;
                        }
                        Ok(None) => {
                            info!("Game feed closed");
                            feed = None;
                        }
                        Err(e) => {
                            warn!(error = %e, "Game feed read failed");
                            feed = None;
                        }
                    }
                }
            }
        }
    }
}

async fn send_all<S>(irc: &mut IrcClient<S>, lines: Vec<OutboundLine>) -> Result<(), TransportError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    for line in lines {
        irc.send(&Command::privmsg(&line.target, &line.text)).await?;
    }
    Ok(())
}
