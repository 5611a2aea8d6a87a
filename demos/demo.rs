use arcovid::{clean_page_text, extract_candidates, is_boilerplate, ProvinceInferrer};

fn main() {
    let inferrer = ProvinceInferrer::new();

    println!("=== 省份推断演示 ===\n");

    let test_cases = vec![
        // 完整名称
        "Córdoba",
        "Santiago del Estero",
        "Tierra del Fuego",
        // 去掉重音、大小写混杂
        "CORDOBA",
        "rio negro",
        "Tucuman",
        // 布宜诺斯艾利斯
        "Ciudad Autónoma de Buenos Aires",
        "CABA Ciudad de Buenos Aires",
        "Provincia de Buenos Aires",
        "Pcia de Bs As",
        "Buenos Aires",
        // 拼写错误
        "Mendza",
        "SantaFe",
        "Neuquen Capital",
        // 无法识别
        "xyz",
        "",
    ];

    for text in test_cases {
        let m = inferrer.infer(text);
        println!("输入: \"{}\"", text);
        println!("  省份: {}", m.province);
        println!("  相似度: {:.3}", m.score);
        println!();
    }

    println!("=== 日报文本抽取演示 ===\n");

    let page = "Informe diario COVID-19\n\
                Se confirmaron 25 nuevos casos: 12 personas en Ciudad de Buenos Aires,\n\
                8 en Provincia de Buenos Aires, (3) en Córdoba y 2 en Chaco.\n\
                Total Argentina 1054";

    for c in extract_candidates(&clean_page_text(page)) {
        if is_boilerplate(&c.place) {
            println!("{:>5}  {:<40} (丢弃)", c.count, c.place);
            continue;
        }
        let m = inferrer.infer(&c.place);
        println!("{:>5}  {:<40} => {} ({:.2})", c.count, c.place, m.province, m.score);
    }
}
