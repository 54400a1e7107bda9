use super::*;
use std::{
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

#[test]
fn upload_name_uses_the_path_file_name() {
    assert_eq!(upload_name(Path::new("data/numbers.txt")), "numbers.txt");
    assert_eq!(upload_name(Path::new("/")), DEFAULT_UPLOAD_FILE_NAME);
    assert_eq!(upload_name(Path::new("data/..")), "vector.txt");
}

#[tokio::test]
async fn read_keeps_file_name_and_bytes() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("sort_vector_file_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("input.csv");
    fs::write(&path, "3,1,2").expect("write");

    let file = VectorFile::read(&path).await.expect("read");

    assert_eq!(file, VectorFile::new("input.csv", b"3,1,2".to_vec()));
    fs::remove_dir_all(&dir).expect("cleanup");
}

#[tokio::test]
async fn read_of_a_directory_is_an_unreadable_file() {
    let err = VectorFile::read(&env::temp_dir()).await.expect_err("directory");

    assert!(matches!(err, InputError::UnreadableFile { .. }));
}
