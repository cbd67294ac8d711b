use candlestash::workspace::{ensure_base_dir, prepare_symbol_dir, symbol_dir};

use crate::helpers::sym;

#[tokio::test]
async fn prepare_is_idempotent_and_clears_contents() {
    let tmp = tempfile::tempdir().unwrap();
    let s = sym("ETH/USDT:USDT");

    let first = prepare_symbol_dir(tmp.path(), &s).await.unwrap();
    assert_eq!(first, tmp.path().join("ETH_USDT_USDT"));
    std::fs::write(first.join("leftover.txt"), "x").unwrap();
    std::fs::create_dir(first.join("nested")).unwrap();

    let second = prepare_symbol_dir(tmp.path(), &s).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(std::fs::read_dir(&second).unwrap().count(), 0);

    let third = prepare_symbol_dir(tmp.path(), &s).await.unwrap();
    assert_eq!(std::fs::read_dir(&third).unwrap().count(), 0);
}

#[tokio::test]
async fn base_dir_is_created_but_never_cleared() {
    let tmp = tempfile::tempdir().unwrap();
    let base = tmp.path().join("a/b");
    ensure_base_dir(&base).await.unwrap();
    std::fs::write(base.join("keep.txt"), "x").unwrap();
    ensure_base_dir(&base).await.unwrap();
    assert!(base.join("keep.txt").exists());
    assert_eq!(symbol_dir(&base, &sym("BTC/USDT")), base.join("BTC_USDT"));
}

#[tokio::test]
async fn other_symbols_are_left_alone() {
    let tmp = tempfile::tempdir().unwrap();
    let eth = prepare_symbol_dir(tmp.path(), &sym("ETH/USDT")).await.unwrap();
    std::fs::write(eth.join("keep.txt"), "x").unwrap();
    prepare_symbol_dir(tmp.path(), &sym("BTC/USDT")).await.unwrap();
    assert!(eth.join("keep.txt").exists());
}
