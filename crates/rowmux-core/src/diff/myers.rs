//! Myers' O((N+M)D) longest common subsequence in linear space.
//!
//! Each range is split at its middle snake, found by running the greedy
//! search from both corners until the two frontiers overlap. The halves on
//! either side of the snake are queued and solved the same way, so only two
//! frontier arrays are ever alive.

/// A rectangle of the edit graph, half-open on both axes.
#[derive(Clone, Copy, Debug)]
struct Range {
    old_start: isize,
    old_end: isize,
    new_start: isize,
    new_end: isize,
}

impl Range {
    fn old_len(&self) -> isize {
        self.old_end - self.old_start
    }

    fn new_len(&self) -> isize {
        self.new_end - self.new_start
    }
}

/// The step that closed the gap between the two searches: one edit plus the
/// diagonal run next to it. A reverse snake runs its diagonal first.
#[derive(Clone, Copy, Debug)]
struct Snake {
    start_x: isize,
    start_y: isize,
    end_x: isize,
    end_y: isize,
    reverse: bool,
}

impl Snake {
    /// First matched pair and length of the diagonal part, if any.
    fn diagonal(&self) -> Option<(isize, isize, isize)> {
        let dx = self.end_x - self.start_x;
        let dy = self.end_y - self.start_y;
        let len = dx.min(dy);
        if len <= 0 {
            return None;
        }
        let (x, y) = if dx == dy || self.reverse {
            (self.start_x, self.start_y)
        } else if dy > dx {
            (self.start_x, self.start_y + 1)
        } else {
            (self.start_x + 1, self.start_y)
        };
        Some((x, y, len))
    }
}

/// Furthest x reached per diagonal; diagonals may be negative.
struct Frontier {
    values: Vec<isize>,
    mid: isize,
}

impl Frontier {
    fn new(max: usize) -> Self {
        Self {
            values: vec![0; 2 * max + 3],
            mid: max as isize + 1,
        }
    }

    fn get(&self, k: isize) -> isize {
        self.values[(k + self.mid) as usize]
    }

    fn set(&mut self, k: isize, x: isize) {
        self.values[(k + self.mid) as usize] = x;
    }
}

enum Split {
    Snake(Snake),
    /// Nothing in the range matches.
    Disjoint,
    Cancelled,
}

/// Returns the matched `(old, new)` index pairs of a longest common
/// subsequence, in ascending order, or `None` once `cancelled` reports true.
///
/// `cancelled` is polled once per range and once per edit distance step.
pub(crate) fn longest_common_subsequence(
    old_len: usize,
    new_len: usize,
    same: impl Fn(usize, usize) -> bool,
    cancelled: &dyn Fn() -> bool,
) -> Option<Vec<(usize, usize)>> {
    let max = (old_len + new_len + 1) / 2;
    let mut forward = Frontier::new(max);
    let mut backward = Frontier::new(max);
    let mut pairs = Vec::new();
    let mut pending = vec![Range {
        old_start: 0,
        old_end: old_len as isize,
        new_start: 0,
        new_end: new_len as isize,
    }];

    while let Some(range) = pending.pop() {
        if cancelled() {
            return None;
        }
        let snake = match middle_snake(range, &same, &mut forward, &mut backward, cancelled) {
            Split::Snake(snake) => snake,
            Split::Disjoint => continue,
            Split::Cancelled => return None,
        };
        if let Some((x, y, len)) = snake.diagonal() {
            pairs.extend((0..len).map(|i| ((x + i) as usize, (y + i) as usize)));
        }
        let before = Range {
            old_start: range.old_start,
            old_end: snake.start_x,
            new_start: range.new_start,
            new_end: snake.start_y,
        };
        let after = Range {
            old_start: snake.end_x,
            old_end: range.old_end,
            new_start: snake.end_y,
            new_end: range.new_end,
        };
        for part in [before, after] {
            if part.old_len() > 0 && part.new_len() > 0 {
                pending.push(part);
            }
        }
    }

    pairs.sort_unstable();
    Some(pairs)
}

fn middle_snake(
    range: Range,
    same: &impl Fn(usize, usize) -> bool,
    forward: &mut Frontier,
    backward: &mut Frontier,
    cancelled: &dyn Fn() -> bool,
) -> Split {
    let n = range.old_len();
    let m = range.new_len();
    if n < 1 || m < 1 {
        return Split::Disjoint;
    }
    let delta = n - m;
    let odd = delta.rem_euclid(2) == 1;
    let max = (n + m + 1) / 2;
    forward.set(1, range.old_start);
    backward.set(1, range.old_end);

    for d in 0..max {
        if cancelled() {
            return Split::Cancelled;
        }

        let mut k = -d;
        while k <= d {
            let take_above = k == -d || (k != d && forward.get(k + 1) > forward.get(k - 1));
            let (start_x, mut x) = if take_above {
                let start = forward.get(k + 1);
                (start, start)
            } else {
                let start = forward.get(k - 1);
                (start, start + 1)
            };
            let mut y = range.new_start + (x - range.old_start) - k;
            let start_y = if d == 0 || x != start_x { y } else { y - 1 };
            while x < range.old_end && y < range.new_end && same(x as usize, y as usize) {
                x += 1;
                y += 1;
            }
            forward.set(k, x);
            let backward_k = delta - k;
            if odd
                && backward_k >= 1 - d
                && backward_k <= d - 1
                && backward.get(backward_k) <= x
            {
                return Split::Snake(Snake {
                    start_x,
                    start_y,
                    end_x: x,
                    end_y: y,
                    reverse: false,
                });
            }
            k += 2;
        }

        let mut k = -d;
        while k <= d {
            let take_above = k == -d || (k != d && backward.get(k + 1) < backward.get(k - 1));
            let (start_x, mut x) = if take_above {
                let start = backward.get(k + 1);
                (start, start)
            } else {
                let start = backward.get(k - 1);
                (start, start - 1)
            };
            let mut y = range.new_end - ((range.old_end - x) - k);
            let start_y = if d == 0 || x != start_x { y } else { y + 1 };
            while x > range.old_start
                && y > range.new_start
                && same((x - 1) as usize, (y - 1) as usize)
            {
                x -= 1;
                y -= 1;
            }
            backward.set(k, x);
            let forward_k = delta - k;
            if !odd && forward_k >= -d && forward_k <= d && forward.get(forward_k) >= x {
                return Split::Snake(Snake {
                    start_x: x,
                    start_y: y,
                    end_x: start_x,
                    end_y: start_y,
                    reverse: true,
                });
            }
            k += 2;
        }
    }
    Split::Disjoint
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lcs(old: &str, new: &str) -> String {
        let old: Vec<char> = old.chars().collect();
        let new: Vec<char> = new.chars().collect();
        let pairs =
            longest_common_subsequence(old.len(), new.len(), |x, y| old[x] == new[y], &|| false)
                .unwrap();
        for window in pairs.windows(2) {
            assert!(window[0].0 < window[1].0 && window[0].1 < window[1].1);
        }
        for &(x, y) in &pairs {
            assert_eq!(old[x], new[y]);
        }
        pairs.iter().map(|&(x, _)| old[x]).collect()
    }

    #[test]
    fn classic_example() {
        assert_eq!(lcs("abcabba", "cbabac").len(), 4);
    }

    #[test]
    fn identical_and_disjoint() {
        assert_eq!(lcs("abc", "abc"), "abc");
        assert_eq!(lcs("abc", "xyz"), "");
        assert_eq!(lcs("", "xyz"), "");
        assert_eq!(lcs("abc", ""), "");
    }

    #[test]
    fn uneven_lengths() {
        assert_eq!(lcs("ab", "a"), "a");
        assert_eq!(lcs("a", "ba"), "a");
        assert_eq!(lcs("xaxbxcx", "abc"), "abc");
        assert_eq!(lcs("abc", "zazbzcz"), "abc");
    }

    #[test]
    fn subsequence_length_is_optimal() {
        let cases = [
            ("kitten", "sitting", 4),
            ("abcdefg", "gfedcba", 1),
            ("aaaa", "aa", 2),
            ("abcbdab", "bdcaba", 4),
        ];
        for (old, new, expected) in cases {
            assert_eq!(lcs(old, new).len(), expected, "{old} -> {new}");
        }
    }

    #[test]
    fn large_disjoint_ranges_match_nothing() {
        let pairs = longest_common_subsequence(3000, 3000, |_, _| false, &|| false).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn cancellation_stops_search() {
        let result = longest_common_subsequence(3, 3, |_, _| false, &|| true);
        assert!(result.is_none());
    }
}
