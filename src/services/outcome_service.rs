use crate::entities::segment_entity as segments;
use crate::error::{AppError, AppResult};
use rand::Rng;

/// 按权重抽取槽位
///
/// 逻辑:
/// 1. 权重按总和归一化 (配置无需加和为 1)
/// 2. draw 取 [0, 1) 的均匀随机数, 乘以总权重后沿槽位顺序递减
/// 3. 浮点误差导致走完列表仍未选中时, 确定性地落到最后一个槽位
///
/// 空列表或总权重 <= 0 视为配置错误
pub fn pick_segment(list: &[segments::Model], draw: f64) -> AppResult<&segments::Model> {
    let Some((last, rest)) = list.split_last() else {
        return Err(AppError::ValidationError("No segments configured".into()));
    };

    let total: f64 = list.iter().map(|s| s.weight.max(0.0)).sum();
    if total <= 0.0 {
        return Err(AppError::ValidationError("No segments configured".into()));
    }

    let mut remaining = draw * total;
    for segment in rest {
        remaining -= segment.weight.max(0.0);
        if remaining < 0.0 {
            return Ok(segment);
        }
    }

    // draw 接近 1.0 时可能因累计误差漏选, 落到最后一个槽位
    Ok(last)
}

/// 随机抽一次 (游戏内真正的抽奖入口)
pub fn resolve_outcome(list: &[segments::Model]) -> AppResult<&segments::Model> {
    let draw: f64 = rand::thread_rng().gen_range(0.0..1.0);
    pick_segment(list, draw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrizeKind;
    use std::collections::HashMap;

    fn segment(id: i64, kind: PrizeKind, weight: f64) -> segments::Model {
        segments::Model {
            id,
            game_id: 1,
            label: format!("segment-{id}"),
            prize_kind: kind,
            prize_value: 10,
            weight,
            color: None,
            position: id as i32,
        }
    }

    #[test]
    fn test_empty_list_rejected() {
        let err = pick_segment(&[], 0.5).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let list = vec![
            segment(1, PrizeKind::Percentage, 0.0),
            segment(2, PrizeKind::NoPrize, 0.0),
        ];
        let err = pick_segment(&list, 0.5).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_single_positive_segment_always_wins() {
        let list = vec![segment(1, PrizeKind::Percentage, 0.7)];
        for draw in [0.0, 0.25, 0.5, 0.999_999] {
            assert_eq!(pick_segment(&list, draw).unwrap().id, 1);
        }
    }

    #[test]
    fn test_zero_weight_segment_never_picked() {
        let list = vec![
            segment(1, PrizeKind::Percentage, 1.0),
            segment(2, PrizeKind::NoPrize, 0.0),
            segment(3, PrizeKind::FixedAmount, 1.0),
        ];
        for i in 0..1000 {
            let draw = i as f64 / 1000.0;
            assert_ne!(pick_segment(&list, draw).unwrap().id, 2);
        }
    }

    #[test]
    fn test_boundaries_of_draw_range() {
        let list = vec![
            segment(1, PrizeKind::Percentage, 0.5),
            segment(2, PrizeKind::NoPrize, 0.5),
        ];
        assert_eq!(pick_segment(&list, 0.0).unwrap().id, 1);
        assert_eq!(pick_segment(&list, 0.999_999_9).unwrap().id, 2);
    }

    #[test]
    fn test_weights_need_not_sum_to_one() {
        // 3 : 1 的非归一化权重, draw < 0.75 应落在第一个
        let list = vec![
            segment(1, PrizeKind::Percentage, 30.0),
            segment(2, PrizeKind::NoPrize, 10.0),
        ];
        assert_eq!(pick_segment(&list, 0.74).unwrap().id, 1);
        assert_eq!(pick_segment(&list, 0.76).unwrap().id, 2);
    }

    /// 统计公平性: 10 万次抽取后各槽位观测频率与 weight/total 偏差在 ±2% 内
    #[test]
    fn test_statistical_fairness() {
        let list = vec![
            segment(1, PrizeKind::Percentage, 0.3),
            segment(2, PrizeKind::FixedAmount, 0.25),
            segment(3, PrizeKind::NoPrize, 0.45),
        ];
        let trials = 100_000usize;
        let mut counts: HashMap<i64, usize> = HashMap::new();
        for _ in 0..trials {
            let picked = resolve_outcome(&list).unwrap();
            *counts.entry(picked.id).or_insert(0) += 1;
        }

        let total_weight: f64 = list.iter().map(|s| s.weight).sum();
        for s in &list {
            let expected = s.weight / total_weight;
            let observed = *counts.get(&s.id).unwrap_or(&0) as f64 / trials as f64;
            assert!(
                (observed - expected).abs() < 0.02,
                "segment {} observed {:.4}, expected {:.4}",
                s.id,
                observed,
                expected
            );
        }
    }
}
