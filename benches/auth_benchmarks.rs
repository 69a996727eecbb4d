use chrono::Utc;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use usergate::auth::{PasswordHasher, Role, TokenIssuer, User};
use usergate::config::AuthConfig;

fn issuer() -> TokenIssuer {
    TokenIssuer::new(AuthConfig {
        jwt_secret: "bench-secret".to_string(),
        ..AuthConfig::default()
    })
}

fn user() -> User {
    let now = Utc::now();
    User {
        id: 1,
        name: "Bench".to_string(),
        email: "bench@x.com".to_string(),
        password_hash: String::new(),
        role: Role::User,
        created_at: now,
        updated_at: now,
    }
}

fn bench_token_issue(c: &mut Criterion) {
    let issuer = issuer();
    let user = user();

    c.bench_function("token_issue", |b| b.iter(|| issuer.issue(black_box(&user))));
}

fn bench_token_verify(c: &mut Criterion) {
    let issuer = issuer();
    let token = issuer.issue(&user()).unwrap();

    c.bench_function("token_verify", |b| {
        b.iter(|| issuer.verify(black_box(&token)))
    });

    c.bench_function("token_verify_rejected", |b| {
        b.iter(|| issuer.verify(black_box("not.a.token")))
    });
}

fn bench_password(c: &mut Criterion) {
    let hasher = PasswordHasher::new(4);
    let hash = hasher.hash("secret1").unwrap();

    let mut group = c.benchmark_group("password");
    group.sample_size(20);
    group.bench_function("hash_cost_4", |b| b.iter(|| hasher.hash(black_box("secret1"))));
    group.bench_function("verify_cost_4", |b| {
        b.iter(|| hasher.verify(black_box("secret1"), black_box(&hash)))
    });
    group.finish();
}

criterion_group!(benches, bench_token_issue, bench_token_verify, bench_password);
criterion_main!(benches);
