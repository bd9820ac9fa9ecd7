use crate::{Handler, MultipartParser};
use bytes::{Buf, Bytes};
use futures_util::stream::{Stream, StreamExt};
#[cfg(feature = "tokio-io")]
use tokio::io::AsyncRead;
#[cfg(feature = "tokio-io")]
use tokio_util::io::ReaderStream;

impl<H: Handler> MultipartParser<H> {
    /// Feeds every chunk of a [`Bytes`] stream into the parser and signals the
    /// end of the message when the stream is exhausted.
    ///
    /// Pauses requested by the handler are resumed right away. Parsing stops
    /// early once the parser has finished.
    ///
    /// # Examples
    ///
    /// ```
    /// use multer_parser::{Handler, MultipartParser};
    /// use bytes::Bytes;
    /// use std::convert::Infallible;
    /// use futures_util::stream::once;
    ///
    /// #[derive(Default)]
    /// struct Count(usize);
    ///
    /// impl Handler for Count {
    ///     fn start_part(&mut self) {
    ///         self.0 += 1;
    ///     }
    /// }
    ///
    /// # async fn run() {
    /// let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
    /// let stream = once(async move { Result::<Bytes, Infallible>::Ok(Bytes::from(data)) });
    ///
    /// let mut parser = MultipartParser::new(Count::default(), "X-BOUNDARY");
    /// parser.parse_stream(stream).await.unwrap();
    ///
    /// assert_eq!(parser.handler().0, 1);
    /// # }
    /// # tokio::runtime::Runtime::new().unwrap().block_on(run());
    /// ```
    pub async fn parse_stream<S, O, E>(&mut self, stream: S) -> crate::Result<()>
    where
        S: Stream<Item = Result<O, E>>,
        O: Into<Bytes>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let mut stream = Box::pin(stream);

        while let Some(chunk) = stream.next().await {
            let mut bytes: Bytes = chunk
                .map_err(|err| crate::Error::StreamReadFailed(err.into()))?
                .into();

            while bytes.has_remaining() && !self.is_finished() {
                self.parse(&mut bytes, false)?;
            }

            if self.is_finished() {
                return Ok(());
            }
        }

        self.parse(&mut Bytes::new(), true)?;
        Ok(())
    }

    /// Feeds an [`AsyncRead`](https://docs.rs/tokio/1/tokio/io/trait.AsyncRead.html) reader into
    /// the parser until it reaches EOF.
    ///
    /// # Optional
    ///
    /// This requires the optional `tokio-io` feature to be enabled.
    #[cfg(feature = "tokio-io")]
    pub async fn parse_reader<R>(&mut self, reader: R) -> crate::Result<()>
    where
        R: AsyncRead,
    {
        self.parse_stream(ReaderStream::new(reader)).await
    }
}
