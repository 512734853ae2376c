//! Chat server and game feed connections.

use super::line::{Command, IrcEvent};
use crate::config::IrcConfig;
use crate::error::TransportError;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_util::codec::{Framed, FramedRead, LinesCodec};
use tracing::{debug, info};

/// Longest inbound line accepted before the codec errors.
pub const MAX_LINE_LENGTH: usize = 8192;

/// Line-framed connection to the chat server.
pub struct IrcClient<S = TcpStream> {
    framed: Framed<S, LinesCodec>,
}

impl IrcClient<TcpStream> {
    /// Connect and send registration (`NICK`, `USER`).
    pub async fn connect(config: &IrcConfig) -> Result<Self, TransportError> {
        let address = config.address();
        let stream = TcpStream::connect(&address).await?;
        info!(address = %address, "Connected to chat server");

        let mut client = Self::from_stream(stream);
        client.register(config).await?;
        Ok(client)
    }
}

impl<S> IrcClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn from_stream(stream: S) -> Self {
        Self {
            framed: Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_LENGTH)),
        }
    }

    pub async fn register(&mut self, config: &IrcConfig) -> Result<(), TransportError> {
        self.send(&Command::Nick(config.nickname.clone())).await?;
        self.send(&Command::User {
            username: config.username().to_string(),
            realname: config.realname.clone(),
        })
        .await
    }

    pub async fn send(&mut self, command: &Command) -> Result<(), TransportError> {
        let line = command.to_string();
        debug!(line = %line, "Sending");
        self.framed.send(line).await?;
        Ok(())
    }

    /// Next inbound event; [`TransportError::Closed`] at end of stream.
    pub async fn next_event(&mut self) -> Result<IrcEvent, TransportError> {
        match self.framed.next().await {
            Some(line) => Ok(IrcEvent::parse(&line?)),
            None => Err(TransportError::Closed),
        }
    }
}

/// Reader for the line-oriented game feed.
pub struct FeedReader<R = TcpStream> {
    lines: FramedRead<R, LinesCodec>,
}

impl FeedReader<TcpStream> {
    pub async fn connect(address: &str) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(address).await?;
        info!(address = %address, "Connected to game feed");
        Ok(Self::from_reader(stream))
    }
}

impl<R> FeedReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH)),
        }
    }

    /// Next feed line; `None` once the feed closes.
    pub async fn next_line(&mut self) -> Result<Option<String>, TransportError> {
        Ok(self.lines.next().await.transpose()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ChatLine;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    fn irc_config() -> IrcConfig {
        toml::from_str(
            r##"
server = "irc.example.net"
nickname = "feedbot"
username = "bot"
channel = "#tpp"
"##,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_register_and_events() {
        let (local, remote) = tokio::io::duplex(1024);
        let mut client = IrcClient::from_stream(local);
        client.register(&irc_config()).await.unwrap();

        let (read_half, mut write_half) = tokio::io::split(remote);
        let mut server_lines = BufReader::new(read_half).lines();
        assert_eq!(server_lines.next_line().await.unwrap().unwrap(), "NICK feedbot");
        assert_eq!(
            server_lines.next_line().await.unwrap().unwrap(),
            "USER bot 0 * :feedbot"
        );

        write_half
            .write_all(b"PING :t1\r\n:alice!a@h PRIVMSG #tpp :!help\r\n")
            .await
            .unwrap();
        assert_eq!(client.next_event().await.unwrap(), IrcEvent::Ping("t1".into()));
        assert_eq!(
            client.next_event().await.unwrap(),
            IrcEvent::Privmsg(ChatLine::new("alice", "#tpp", "!help"))
        );

        drop(write_half);
        drop(server_lines);
        assert!(matches!(client.next_event().await, Err(TransportError::Closed)));
    }

    #[tokio::test]
    async fn test_feed_reader() {
        let (mut writer, reader) = tokio::io::duplex(256);
        let mut feed = FeedReader::from_reader(reader);
        writer.write_all(b"|win|Red\n<b>hi</b>\r\n").await.unwrap();
        drop(writer);

        assert_eq!(feed.next_line().await.unwrap().as_deref(), Some("|win|Red"));
        assert_eq!(feed.next_line().await.unwrap().as_deref(), Some("<b>hi</b>"));
        assert_eq!(feed.next_line().await.unwrap(), None);
    }
}
