use actix_cors::Cors;

/// 游戏挂件以脚本形式嵌入任意店铺前台, 跨域来源不可枚举
pub fn create_cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|_, _req_head| true)
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        // 挂件会带自定义 Header (指纹等), 放宽避免预检失败
        .allow_any_header()
        .max_age(3600)
}
