use warden_core::{HashingError, PasswordHasher};

fn hasher() -> PasswordHasher {
    PasswordHasher::new(4, 2)
}

#[tokio::test]
async fn test_hash_password_success() {
    let password = "testpassword123";
    let hash = hasher().hash(password).await.unwrap();

    assert!(!hash.is_empty());
    assert_ne!(hash, password);
    assert!(hash.starts_with("$2"));
}

#[tokio::test]
async fn test_hash_is_salted() {
    let hasher = hasher();
    let first = hasher.hash("samepassword").await.unwrap();
    let second = hasher.hash("samepassword").await.unwrap();

    assert_ne!(first, second);
    assert!(hasher.verify("samepassword", &first).await.unwrap());
    assert!(hasher.verify("samepassword", &second).await.unwrap());
}

#[tokio::test]
async fn test_verify_password_incorrect() {
    let hasher = hasher();
    let hash = hasher.hash("correctpassword").await.unwrap();

    assert!(!hasher.verify("wrongpassword", &hash).await.unwrap());
}

#[tokio::test]
async fn test_passwords_past_bcrypt_limit_are_distinct() {
    let hasher = hasher();
    let base = "a".repeat(72);
    let hash = hasher.hash(&format!("{base}one")).await.unwrap();

    assert!(hasher.verify(&format!("{base}one"), &hash).await.unwrap());
    assert!(!hasher.verify(&format!("{base}two"), &hash).await.unwrap());
}

#[tokio::test]
async fn test_verify_malformed_digest() {
    let err = hasher().verify("password", "not-a-bcrypt-hash").await.unwrap_err();
    assert!(matches!(err, HashingError::InvalidDigest));
}

#[tokio::test]
async fn test_concurrent_hashing_is_bounded() {
    let hasher = hasher();
    let mut handles = Vec::new();

    for i in 0..6 {
        let hasher = hasher.clone();
        handles.push(tokio::spawn(async move {
            let password = format!("password-{i}");
            let hash = hasher.hash(&password).await.unwrap();
            hasher.verify(&password, &hash).await.unwrap()
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap());
    }
}
