use bytes::Bytes;
use futures_util::stream;
use multer_parser::{Flow, Handler, MultipartParser, PartHeaders};

// Prints each part's name and size as the content streams by.
#[derive(Default)]
struct PrintParts {
    headers: PartHeaders,
    size: usize,
}

impl Handler for PrintParts {
    fn start_part(&mut self) {
        self.headers.clear();
        self.size = 0;
    }

    fn parsed_field(&mut self, name: &str, value: &str) {
        if let Err(err) = self.headers.push(name, value) {
            eprintln!("skipping header {:?}: {}", name, err);
        }
    }

    fn content(&mut self, data: &[u8], last: bool) -> Flow {
        self.size += data.len();
        if last {
            println!(
                "Name: {:?}, File Name: {:?}, Content-Type: {:?}, Size: {}",
                self.headers.name(),
                self.headers.file_name(),
                self.headers.content_type(),
                self.size
            );
        }
        Flow::Continue
    }

    fn early_eof(&mut self) {
        eprintln!("multipart body ended early");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let boundary = multer_parser::parse_boundary("multipart/form-data; boundary=X-BOUNDARY")?;

    let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"My Field\"\r\n\r\nabcd\r\n--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"File Field\"; filename=\"a-text-file.txt\"\r\nContent-Type: text/plain\r\n\r\nHello world\nHello\r\nWorld\rAgain\r\n--X-BOUNDARY--\r\n";

    // Simulate a body arriving in small network reads.
    let chunks: Vec<Result<Bytes, std::io::Error>> = data
        .as_bytes()
        .chunks(7)
        .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
        .collect();

    let mut parser = MultipartParser::new(PrintParts::default(), boundary);
    parser.parse_stream(stream::iter(chunks)).await?;

    Ok(())
}
