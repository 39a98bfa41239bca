use trail_portal::storage::{ImageStorage, LocalImageStorage, MockImageStorage};
use uuid::Uuid;

fn temp_root() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("trail-portal-test-{}", Uuid::new_v4()))
}

#[tokio::test]
async fn test_local_storage_writes_file_and_builds_url() {
    let root = temp_root();
    let storage = LocalImageStorage::new(root.to_str().unwrap(), "http://localhost:3000/");
    storage.ensure_content_root().await;

    let url = storage.save("summit", ".png", b"png-bytes").await.unwrap();

    assert_eq!(url, "http://localhost:3000/Images/summit.png");
    let contents = std::fs::read(root.join("summit.png")).unwrap();
    assert_eq!(contents, b"png-bytes");

    let _ = std::fs::remove_dir_all(&root);
}

#[tokio::test]
async fn test_same_file_name_overwrites_previous_upload() {
    // Files are addressed by name only; the second writer wins.
    let root = temp_root();
    let storage = LocalImageStorage::new(root.to_str().unwrap(), "http://localhost:3000");
    storage.ensure_content_root().await;

    storage.save("photo", ".jpg", b"first").await.unwrap();
    storage.save("photo", ".jpg", b"second").await.unwrap();

    let contents = std::fs::read(root.join("photo.jpg")).unwrap();
    assert_eq!(contents, b"second");

    let _ = std::fs::remove_dir_all(&root);
}

#[tokio::test]
async fn test_file_names_cannot_escape_the_content_root() {
    let root = temp_root();
    let storage = LocalImageStorage::new(root.to_str().unwrap(), "http://localhost:3000");
    storage.ensure_content_root().await;

    let url = storage.save("../../evil", ".png", b"x").await.unwrap();

    assert_eq!(url, "http://localhost:3000/Images/evil.png");
    assert!(root.join("evil.png").exists());
    assert!(!root.parent().unwrap().join("evil.png").exists());

    let _ = std::fs::remove_dir_all(&root);
}

#[tokio::test]
async fn test_mock_storage_mirrors_the_url_shape() {
    let storage = MockImageStorage::new();

    let url = storage.save("summit", ".png", b"ignored").await.unwrap();

    assert_eq!(url, "http://localhost:3000/Images/summit.png");
}

#[tokio::test]
async fn test_failing_mock_returns_error() {
    let storage = MockImageStorage::new_failing();

    assert!(storage.save("summit", ".png", b"ignored").await.is_err());
}
