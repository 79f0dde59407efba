//! Image insertion through an uploader.

use async_trait::async_trait;
use duplex_babel::doc::Block;
use duplex_babel::editor::{EditorHost, ImageUploader, UploadPayload};
use duplex_babel::{FormatError, MemoryEditor, ModeController};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Hosted {
    base: &'static str,
    calls: AtomicUsize,
}

#[async_trait]
impl ImageUploader for Hosted {
    async fn upload(&self, payload: UploadPayload) -> Result<String, FormatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{}/{}", self.base, payload.name))
    }
}

struct Rejecting;

#[async_trait]
impl ImageUploader for Rejecting {
    async fn upload(&self, _payload: UploadPayload) -> Result<String, FormatError> {
        Err(FormatError::Upload("quota exceeded".to_string()))
    }
}

struct Blank;

#[async_trait]
impl ImageUploader for Blank {
    async fn upload(&self, _payload: UploadPayload) -> Result<String, FormatError> {
        Ok(String::new())
    }
}

fn png(name: &str) -> UploadPayload {
    UploadPayload::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}

fn controller() -> (ModeController<MemoryEditor>, Rc<RefCell<Vec<String>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let editor = MemoryEditor::from_markup("<p>x</p>").unwrap();
    let ctl = ModeController::new(editor)
        .with_listener(move |markup: &str| sink.borrow_mut().push(markup.to_string()));
    (ctl, seen)
}

#[tokio::test]
async fn test_uploaded_image_is_inserted() {
    let (mut ctl, seen) = controller();
    let uploader = Hosted {
        base: "https://cdn.example.com",
        calls: AtomicUsize::new(0),
    };
    ctl.insert_image(&uploader, png("a.png"), Some("A".to_string()))
        .await
        .unwrap();

    let expected = r#"<p>x</p><img src="https://cdn.example.com/a.png" alt="A">"#;
    assert_eq!(ctl.host().markup().unwrap(), expected);
    assert_eq!(seen.borrow().last().map(String::as_str), Some(expected));
    assert_eq!(uploader.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_upload_changes_nothing() {
    let (mut ctl, seen) = controller();
    let err = ctl
        .insert_image(&Rejecting, png("a.png"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, FormatError::Upload(_)));
    assert_eq!(ctl.host().markup().unwrap(), "<p>x</p>");
    assert!(!ctl
        .host()
        .document()
        .children
        .iter()
        .any(|b| matches!(b, Block::Image(_))));
    assert!(seen.borrow().is_empty());
}

#[tokio::test]
async fn test_non_image_is_not_uploaded() {
    let (mut ctl, _) = controller();
    let uploader = Hosted {
        base: "https://cdn.example.com",
        calls: AtomicUsize::new(0),
    };
    let payload = UploadPayload::new("notes.pdf", "application/pdf", vec![]);
    let err = ctl.insert_image(&uploader, payload, None).await.unwrap_err();
    assert!(matches!(err, FormatError::Upload(_)));
    assert_eq!(uploader.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_address_inserts_nothing() {
    let (mut ctl, seen) = controller();
    let err = ctl.insert_image(&Blank, png("a.png"), None).await.unwrap_err();
    assert!(matches!(err, FormatError::Upload(_)));
    assert_eq!(ctl.host().markup().unwrap(), "<p>x</p>");
    assert!(seen.borrow().is_empty());
}

#[tokio::test]
async fn test_upload_in_markdown_mode_extends_buffer() {
    let (mut ctl, seen) = controller();
    ctl.toggle().unwrap();
    let uploader = Hosted {
        base: "/img",
        calls: AtomicUsize::new(0),
    };
    ctl.insert_image(&uploader, png("b.png"), Some("B".to_string()))
        .await
        .unwrap();
    assert_eq!(ctl.markdown(), Some("x\n\n![B](/img/b.png)"));
    assert_eq!(
        seen.borrow().last().map(String::as_str),
        Some(r#"<p>x</p><img src="/img/b.png" alt="B">"#)
    );
    assert_eq!(ctl.host().markup().unwrap(), "<p>x</p>");
}
