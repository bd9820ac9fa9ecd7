#![no_main]

use libfuzzer_sys::fuzz_target;
use multer_parser::{Flow, Handler, MultipartParser};

#[derive(Debug, Default, PartialEq)]
struct Record {
    events: Vec<String>,
    content: Vec<u8>,
}

impl Handler for Record {
    fn start_part(&mut self) {
        self.events.push("start".to_owned());
    }

    fn parsed_field(&mut self, name: &str, value: &str) {
        assert!(!name.is_empty());
        self.events.push(format!("{}: {}", name, value));
    }

    fn header_complete(&mut self) -> Flow {
        self.events.push("headers".to_owned());
        Flow::Continue
    }

    fn content(&mut self, data: &[u8], last: bool) -> Flow {
        self.content.extend_from_slice(data);
        if last {
            self.events.push(format!("content {}", self.content.len()));
            self.content.clear();
        }
        Flow::Continue
    }

    fn message_complete(&mut self) -> Flow {
        self.events.push("complete".to_owned());
        Flow::Continue
    }

    fn early_eof(&mut self) {
        self.events.push("eof".to_owned());
    }
}

fn run(chunks: &[&[u8]]) -> Option<Record> {
    let mut parser = MultipartParser::new(Record::default(), "X-BOUNDARY");

    for (idx, chunk) in chunks.iter().enumerate() {
        let mut buf: &[u8] = chunk;
        parser.parse(&mut buf, idx == chunks.len() - 1).ok()?;
    }

    Some(parser.into_handler())
}

fuzz_target!(|data: &[u8]| {
    let (split, data) = match data.split_first() {
        Some((split, data)) => (*split as usize % (data.len() + 1), data),
        None => return,
    };

    let whole = run(&[data]);
    let halves = run(&[&data[..split], &data[split..]]);

    // Errors may surface at different points, but a clean parse must not depend
    // on where the input was split.
    if let (Some(whole), Some(halves)) = (whole, halves) {
        assert_eq!(whole.events, halves.events);
    }
});
