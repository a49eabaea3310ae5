use super::*;

#[test]
fn nested_blocks_shallow() {
    fn depth_of(levels: u32) -> u32 {
        ensure_sufficient_stack(|| if levels == 0 { 0 } else { 1 + depth_of(levels - 1) })
    }

    assert_eq!(depth_of(16), 16);
}

#[test]
fn nested_blocks_deep() {
    // A naive walk this deep overflows the default 8MB main-thread stack.
    fn walk(levels: u64, acc: &mut Vec<u64>) -> u64 {
        ensure_sufficient_stack(|| {
            if levels == 0 {
                return 0;
            }
            if levels % 25_000 == 0 {
                acc.push(levels);
            }
            walk(levels - 1, acc) + 1
        })
    }

    let mut marks = Vec::new();
    assert_eq!(walk(100_000, &mut marks), 100_000);
    assert_eq!(marks, vec![100_000, 75_000, 50_000, 25_000]);
}

#[test]
fn passes_result_through() {
    let result: Result<&str, String> = ensure_sufficient_stack(|| Ok("done"));
    assert_eq!(result, Ok("done"));
}
