use super::format::{decimal, percent, percentage_points};
use super::styles::*;
use super::{ReportContext, ReportKind, charts};
use crate::error::ReportError;
use itertools::Itertools;
use ods_indicator::Trend;
use ods_layout::{ColumnWidth, Document, Table};
use ods_types::{Color, Stroke};
use std::cmp::Ordering;

const SECTION_GAP: f32 = 20.0;
const PARAGRAPH_GAP: f32 = 12.0;

fn figure(doc: &mut Document, number: usize, drawing: ods_types::Drawing, caption: &str) {
    doc.figure(drawing)
        .paragraph(CAPTION, &format!("Figura {}: {}", number, caption))
        .spacer(PARAGRAPH_GAP);
}

pub(super) fn build(ctx: &ReportContext) -> Result<Document, ReportError> {
    let mut doc = Document::new(ReportKind::Technical.title());
    title_block(&mut doc, ctx);
    introduction(&mut doc, ctx);
    methodology(&mut doc, ctx);
    results(&mut doc, ctx)?;
    conclusions(&mut doc, ctx);
    Ok(doc)
}

fn title_block(doc: &mut Document, ctx: &ReportContext) {
    doc.paragraph(TITLE, "RELATÓRIO TÉCNICO: ODS 12")
        .paragraph(SUBTITLE, &format!("Consumo e Produção Responsáveis em {}", ctx.dataset.region))
        .spacer(20.0)
        .paragraph(DATE_LINE, &format!("Data: {}", super::format::date(ctx.generated_on)))
        .paragraph(DATE_LINE, &format!("Dados atualizados em: {}", ctx.last_updated()))
        .spacer(30.0);
}

fn introduction(doc: &mut Document, ctx: &ReportContext) {
    doc.heading(SECTION, "1. INTRODUÇÃO", 1)
        .paragraph(
            BODY,
            &format!(
                "O Objetivo de Desenvolvimento Sustentável 12 (ODS 12) tem como foco assegurar padrões de produção e \
                 consumo sustentáveis. Este relatório técnico apresenta um diagnóstico da situação atual do estado de \
                 {} em relação a um dos principais indicadores do ODS 12: a taxa de reciclagem de resíduos sólidos \
                 urbanos.",
                ctx.dataset.region
            ),
        )
        .spacer(PARAGRAPH_GAP)
        .paragraph(
            BODY,
            "A gestão adequada de resíduos sólidos é um componente essencial para o desenvolvimento sustentável, \
             com impactos diretos na qualidade de vida das populações urbanas, na preservação ambiental e na \
             eficiência no uso de recursos naturais. Através da análise deste indicador, é possível avaliar o \
             progresso do estado em direção a padrões mais sustentáveis de produção e consumo.",
        )
        .spacer(SECTION_GAP);
}

fn methodology(doc: &mut Document, ctx: &ReportContext) {
    let analysis = ctx.analysis;
    doc.heading(SECTION, "2. METODOLOGIA", 1)
        .paragraph(
            BODY,
            &format!(
                "Este relatório foi elaborado a partir da análise de dados históricos da taxa de reciclagem de \
                 resíduos sólidos urbanos em {} entre {} e {}. Os dados foram obtidos através de arquivos JSON \
                 estruturados que integram o Sistema de Indicadores do {}.",
                ctx.dataset.region, analysis.initial_year, analysis.last_observed_year, ctx.dataset.organization
            ),
        )
        .spacer(PARAGRAPH_GAP)
        .heading(SUBSECTION, "2.1 Fonte dos Dados", 2)
        .paragraph(
            BODY,
            "Os dados primários são originários do Sistema Nacional de Informações sobre Saneamento (SNIS) e de \
             pesquisas do IBGE, compilados e validados pela equipe técnica do LIMFS. A taxa de reciclagem é \
             calculada como a proporção entre o volume de resíduos reciclados ou coletados seletivamente e o total \
             de resíduos sólidos urbanos gerados no estado, expressa em percentual.",
        )
        .spacer(PARAGRAPH_GAP)
        .heading(SUBSECTION, "2.2 Processamento e Análise", 2)
        .paragraph(
            BODY,
            &format!(
                "Para a análise dos dados, utilizamos técnicas estatísticas para identificar tendências, calcular \
                 taxas de crescimento anual, e projetar cenários futuros. Também realizamos análises comparativas \
                 entre a situação atual de {}, a média nacional, o estado com melhor desempenho e a meta \
                 estabelecida para {} em alinhamento com os compromissos nacionais para os ODS.",
                ctx.dataset.region, analysis.target.year
            ),
        )
        .spacer(SECTION_GAP);
}

fn trend_phrase(trend: Trend) -> &'static str {
    match trend {
        Trend::Increasing => "apresentou crescimento constante",
        Trend::Variable => "apresentou oscilações",
    }
}

fn results(doc: &mut Document, ctx: &ReportContext) -> Result<(), ReportError> {
    let dataset = ctx.dataset;
    let analysis = ctx.analysis;
    let target = analysis.target;
    let region = &dataset.region;

    doc.heading(SECTION, "3. RESULTADOS", 1);

    // 3.1
    doc.heading(SUBSECTION, "3.1 Evolução Histórica da Taxa de Reciclagem", 2)
        .paragraph(
            BODY,
            &format!(
                "A taxa de reciclagem de resíduos sólidos urbanos em {} {} ao longo dos últimos {} anos, saindo de \
                 {} em {} para {} em {}, o que representa uma variação de {} no período.",
                region,
                trend_phrase(analysis.trend),
                dataset.history.len(),
                percent(analysis.initial_value, 1),
                analysis.initial_year,
                percent(analysis.current_value, 1),
                analysis.last_observed_year,
                percent(analysis.percent_change, 1)
            ),
        )
        .spacer(PARAGRAPH_GAP);
    figure(
        doc,
        1,
        charts::history_line(ctx)?,
        &format!(
            "Evolução da Taxa de Reciclagem de Resíduos Sólidos em {} ({}-{})",
            region, analysis.initial_year, analysis.last_observed_year
        ),
    );
    doc.paragraph(
        BODY,
        &format!(
            "A taxa de crescimento anual composta (CAGR) foi de {}, indicando um progresso gradual na \
             implementação de políticas e práticas de coleta seletiva e reciclagem no estado.",
            percent(analysis.compound_annual_growth_rate, 1)
        ),
    )
    .spacer(SECTION_GAP);

    // 3.2
    let national = dataset.benchmarks.national_average;
    let position = match analysis.current_value.partial_cmp(&national) {
        Some(Ordering::Greater) => "um desempenho acima da média do país, demonstrando avanços importantes",
        Some(Ordering::Less) => "um desempenho abaixo da média do país, o que evidencia a necessidade de avanços",
        _ => "um desempenho equivalente à média do país, com espaço para avanços",
    };
    doc.heading(SUBSECTION, "3.2 Análise Comparativa", 2)
        .paragraph(
            BODY,
            &format!(
                "Quando comparamos o desempenho atual de {} ({}) com a média nacional ({}), observamos que o estado \
                 apresenta {} na implementação de políticas de gestão de resíduos.",
                region,
                percent(analysis.current_value, 1),
                percent(national, 1),
                position
            ),
        )
        .spacer(PARAGRAPH_GAP);
    figure(doc, 2, charts::comparison_bars(ctx)?, "Comparação da Taxa de Reciclagem: Situação Atual vs. Meta");
    let gap_sentence = if analysis.gap > 0.0 {
        format!(
            "No entanto, existe ainda uma lacuna de {} em relação à meta nacional de {} para {}, estabelecida em \
             alinhamento com os compromissos do Brasil para os ODS.",
            percentage_points(analysis.gap, 1),
            percent(target.value, 1),
            target.year
        )
    } else {
        format!(
            "O estado já alcançou a meta nacional de {} prevista para {}, superando-a em {}.",
            percent(target.value, 1),
            target.year,
            percentage_points(-analysis.gap, 1)
        )
    };
    doc.paragraph(BODY, &gap_sentence)
        .spacer(PARAGRAPH_GAP)
        .paragraph(
            BODY,
            &format!(
                "O estado com melhor desempenho no país atualmente registra taxa de {}, demonstrando que é possível \
                 alcançar índices mais elevados de reciclagem com políticas públicas eficientes e participação ativa \
                 da sociedade.",
                percent(dataset.benchmarks.best_state, 1)
            ),
        )
        .spacer(SECTION_GAP);

    // 3.3
    doc.heading(SUBSECTION, "3.3 Projeções e Metas", 2)
        .paragraph(
            BODY,
            &format!(
                "Para atingir a meta de {} de reciclagem até {}, {} precisará variar sua taxa de reciclagem em {} \
                 nos próximos {} anos, o que equivale a uma variação anual média de {}.",
                percent(target.value, 1),
                target.year,
                region,
                percentage_points(analysis.gap, 1),
                analysis.years_remaining,
                percentage_points(analysis.required_annual_increment, 2)
            ),
        )
        .spacer(PARAGRAPH_GAP);
    figure(
        doc,
        3,
        charts::projection_line(ctx)?,
        &format!("Projeção da Taxa de Reciclagem até {} para Atingir a Meta", target.year),
    );
    let latest = analysis.latest_annual_change;
    let comparison = if analysis.required_annual_increment > latest {
        "é superior à taxa de crescimento mais recente"
    } else {
        "é compatível com a taxa de crescimento mais recente"
    };
    let consequence = if analysis.on_track() {
        "Mantido o ritmo médio histórico, a meta seria alcançada"
    } else {
        "Mantido o ritmo médio histórico, a meta não seria alcançada, o que indica que esforços adicionais e \
         estratégias mais assertivas serão necessários"
    };
    let pace_ratio = match analysis.required_pace_ratio() {
        Some(ratio) => format!(
            " O ritmo necessário equivale a {} vezes a variação anual média observada desde {}.",
            decimal(ratio, 1),
            analysis.initial_year
        ),
        None => String::new(),
    };
    doc.paragraph(
        BODY,
        &format!(
            "Esta taxa de crescimento necessária ({} por ano) {} ({} entre {} e {}).{} {}: o indicador chegaria a \
             {} em {}.",
            percentage_points(analysis.required_annual_increment, 2),
            comparison,
            percentage_points(latest, 1),
            analysis.last_observed_year - 1,
            analysis.last_observed_year,
            pace_ratio,
            consequence,
            percent(analysis.historical_pace_estimate, 1),
            target.year
        ),
    )
    .spacer(SECTION_GAP);

    // 3.4
    doc.heading(SUBSECTION, "3.4 Iniciativas e Infraestrutura", 2)
        .paragraph(
            BODY,
            &format!(
                "A análise da infraestrutura atual de gestão de resíduos em {} mostra que há uma distribuição \
                 desigual de iniciativas entre os {} municípios do estado:",
                region, dataset.municipality_count
            ),
        )
        .spacer(PARAGRAPH_GAP);
    figure(
        doc,
        4,
        charts::program_bars(ctx)?,
        &format!("Iniciativas de Gestão de Resíduos por Município em {}", region),
    );

    let table = dataset.programs.iter().fold(
        Table::new(vec![ColumnWidth::Points(250.0), ColumnWidth::Points(100.0), ColumnWidth::Points(100.0)])
            .header(["Iniciativa", "Municípios Atendidos", "Percentual do Total"])
            .styles(TABLE_HEADER, TABLE_CELL)
            .grid(Stroke::solid(Color::BLACK, 1.0)),
        |table, program| {
            table.row([program.name.clone(), program.municipalities.to_string(), percent(program.percent, 1)])
        },
    );
    doc.table(table).spacer(PARAGRAPH_GAP);

    if let Some((narrowest, widest)) = dataset
        .programs
        .iter()
        .minmax_by(|a, b| a.percent.total_cmp(&b.percent))
        .into_option()
    {
        doc.paragraph(
            BODY,
            &format!(
                "Observa-se que a iniciativa menos difundida, {}, alcança apenas {} dos municípios, e mesmo a \
                 mais difundida, {}, está presente em somente {}. Esta distribuição desigual contribui para os desafios enfrentados \
                 no avanço da reciclagem em todo o estado.",
                narrowest.name.to_lowercase(),
                percent(narrowest.percent, 1),
                widest.name.to_lowercase(),
                percent(widest.percent, 1)
            ),
        );
    }
    doc.spacer(SECTION_GAP);
    Ok(())
}

fn conclusions(doc: &mut Document, ctx: &ReportContext) {
    let dataset = ctx.dataset;
    let analysis = ctx.analysis;
    let target = analysis.target;

    doc.heading(SECTION, "4. CONCLUSÕES E RECOMENDAÇÕES", 1)
        .paragraph(
            BODY,
            &format!(
                "Com base na análise dos dados e indicadores relacionados à reciclagem de resíduos sólidos urbanos \
                 em {}, chegamos às seguintes conclusões e recomendações:",
                dataset.region
            ),
        )
        .spacer(PARAGRAPH_GAP);

    let mut findings = vec![match analysis.trend {
        Trend::Increasing => format!(
            "O estado de {} apresenta uma tendência positiva consistente na taxa de reciclagem, com crescimento em \
             todos os anos analisados ({}-{}).",
            dataset.region, analysis.initial_year, analysis.last_observed_year
        ),
        Trend::Variable => format!(
            "A taxa de reciclagem de {} oscilou ao longo do período analisado ({}-{}), sem uma tendência de \
             crescimento contínuo.",
            dataset.region, analysis.initial_year, analysis.last_observed_year
        ),
    }];
    findings.push(if analysis.on_track() {
        format!(
            "O ritmo médio de crescimento (aproximadamente {} por ano) é suficiente para atingir a meta nacional \
             de {} até {}.",
            percentage_points(analysis.average_annual_increment, 1),
            percent(target.value, 0),
            target.year
        )
    } else {
        format!(
            "Apesar dos avanços, o ritmo médio de crescimento (aproximadamente {} por ano) não será suficiente \
             para atingir a meta nacional de {} até {}.",
            percentage_points(analysis.average_annual_increment, 1),
            percent(target.value, 0),
            target.year
        )
    });
    findings.push(
        "Existe uma distribuição desigual de infraestrutura de reciclagem entre os municípios, com concentração \
         nas áreas mais urbanizadas e carência nos municípios de pequeno porte."
            .to_string(),
    );
    if let Some(cooperatives) = dataset.program("Cooperativas de Reciclagem") {
        findings.push(format!(
            "O envolvimento de cooperativas de catadores de materiais recicláveis ainda é limitado, estando \
             presentes em apenas {} dos municípios, o que indica um potencial inexplorado de inclusão social \
             através da reciclagem.",
            percent(cooperatives.percent, 1)
        ));
    }

    doc.heading(SUBSECTION, "4.1 Conclusões", 2)
        .bullets(BULLET, &findings)
        .spacer(PARAGRAPH_GAP)
        .heading(SUBSECTION, "4.2 Recomendações", 2)
        .bullets(
            BULLET,
            [
                "<b>Ampliação da coleta seletiva:</b> Implementar programas de expansão da coleta seletiva para \
                 todos os municípios, com meta de atingir pelo menos 50% dos municípios até 2027.",
                "<b>Fortalecimento de cooperativas:</b> Desenvolver políticas públicas de apoio técnico e \
                 financeiro às cooperativas de catadores, promovendo sua formalização e integração nos sistemas \
                 municipais de gestão de resíduos.",
                "<b>Educação ambiental:</b> Intensificar campanhas de conscientização sobre consumo responsável e \
                 separação correta de resíduos, com foco em escolas e comunidades.",
                "<b>Incentivos econômicos:</b> Criar mecanismos de incentivo econômico para empresas e municípios \
                 que adotarem práticas avançadas de gestão de resíduos e economia circular.",
                "<b>Infraestrutura:</b> Investir na implantação de ecopontos, centrais de triagem e plantas de \
                 compostagem em consórcios regionais, permitindo ganhos de escala para municípios de menor porte.",
                "<b>Monitoramento:</b> Aprimorar os sistemas de coleta e análise de dados sobre reciclagem em todos \
                 os municípios, garantindo transparência e possibilidade de correção de rumos nas políticas \
                 públicas.",
            ],
        )
        .spacer(SECTION_GAP)
        .paragraph(
            BODY,
            &format!(
                "O avanço de {} na taxa de reciclagem de resíduos sólidos urbanos ({} ao ano, em média) mostra que \
                 o estado está em movimento, mas ainda serão necessários esforços adicionais e aceleração das \
                 políticas públicas para alcançar as metas estabelecidas para o ODS 12 até {}. A integração entre \
                 poder público, setor privado e sociedade civil será fundamental para transformar a gestão de \
                 resíduos em uma oportunidade de desenvolvimento sustentável para todo o estado.",
                ctx.dataset.region,
                percentage_points(analysis.average_annual_increment, 2),
                target.year
            ),
        )
        .spacer(30.0)
        .paragraph(
            CAPTION,
            &format!(
                "{}<br/>Relatório gerado em conformidade com as diretrizes dos Objetivos de Desenvolvimento \
                 Sustentável (ODS)",
                dataset.organization
            ),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::with_context;
    use ods_layout::{Block, Paragraph};

    fn texts(doc: &Document) -> Vec<String> {
        doc.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(Paragraph { runs, .. }) => Some(runs.iter().map(|r| r.text.as_str()).collect()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn narrative_uses_computed_values() {
        with_context(|ctx| {
            let doc = build(ctx).unwrap();
            let all = texts(&doc).join("\n");
            assert!(all.contains("saindo de 2,1% em 2017 para 6,2% em 2024"));
            assert!(all.contains("variação de 195,2% no período"));
            assert!(all.contains("lacuna de 8,8 pontos percentuais"));
            assert!(all.contains("variação anual média de 1,47 ponto percentual"));
            assert!(all.contains("acima da média do país"));
            assert!(all.contains("equivale a 2,5 vezes a variação anual média observada desde 2017"));
            assert!(all.contains("Figura 4: Iniciativas de Gestão de Resíduos por Município em Sergipe"));
        });
    }

    #[test]
    fn headings_form_a_two_level_outline() {
        with_context(|ctx| {
            let doc = build(ctx).unwrap();
            let levels: Vec<u8> = doc
                .blocks
                .iter()
                .filter_map(|b| match b {
                    Block::Paragraph(p) => p.outline,
                    _ => None,
                })
                .collect();
            assert_eq!(levels.iter().filter(|&&l| l == 1).count(), 4);
            assert_eq!(levels.iter().filter(|&&l| l == 2).count(), 8);
        });
    }

    #[test]
    fn programs_table_lists_every_program() {
        with_context(|ctx| {
            let doc = build(ctx).unwrap();
            let table = doc
                .blocks
                .iter()
                .find_map(|b| match b {
                    Block::Table(t) => Some(t),
                    _ => None,
                })
                .unwrap();
            assert_eq!(table.rows.len(), ctx.dataset.programs.len());
            assert_eq!(table.rows[1], vec!["Cooperativas de Reciclagem", "8", "10,7%"]);
        });
    }
}
