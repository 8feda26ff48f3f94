use super::format::{percent, percentage_points};
use super::styles::*;
use super::{ReportContext, ReportKind, charts};
use crate::error::ReportError;
use itertools::Itertools;
use ods_layout::{ColumnWidth, Document, Table};
use ods_types::{Color, Drawing, Stroke};

const BLOCK_GAP: f32 = 10.0;
const SECTION_GAP: f32 = 15.0;

fn figure(doc: &mut Document, number: usize, drawing: Drawing, caption: &str) {
    doc.spacer(BLOCK_GAP)
        .figure(drawing)
        .spacer(BLOCK_GAP)
        .paragraph(CAPTION, &format!("Figura {}: {}", number, caption))
        .spacer(SECTION_GAP);
}

pub(super) fn build(ctx: &ReportContext) -> Result<Document, ReportError> {
    let dataset = ctx.dataset;
    let region = &dataset.region;
    let mut doc = Document::new(ReportKind::Enhanced.title());

    doc.paragraph(ENHANCED_TITLE, "RELATÓRIO TÉCNICO APRIMORADO: ODS 12 - CONSUMO E PRODUÇÃO RESPONSÁVEIS")
        .spacer(20.0)
        .heading(ENHANCED_SECTION, "1. INTRODUÇÃO", 1)
        .paragraph(
            ENHANCED_BODY,
            &format!(
                "Este relatório apresenta uma análise técnica aprofundada sobre o ODS 12 - Consumo e Produção \
                 Responsáveis, com foco na situação atual em {}. O documento foi elaborado pelo {} e tem como \
                 objetivo fornecer dados atualizados e recomendações para orientar políticas públicas e iniciativas \
                 relacionadas à sustentabilidade no consumo e na produção.",
                region, dataset.organization
            ),
        )
        .spacer(BLOCK_GAP);

    current_situation(&mut doc, ctx)?;
    composition(&mut doc, ctx)?;
    municipalities(&mut doc, ctx)?;
    projection(&mut doc, ctx)?;
    doc.page_break();
    recommendations(&mut doc, ctx);
    conclusion(&mut doc, ctx);

    doc.page_break()
        .heading(ENHANCED_SECTION, "9. REFERÊNCIAS", 1)
        .bullets(ENHANCED_LIST, &dataset.references);
    Ok(doc)
}

fn current_situation(doc: &mut Document, ctx: &ReportContext) -> Result<(), ReportError> {
    let analysis = ctx.analysis;
    let target = analysis.target;
    let value = ctx
        .record
        .data
        .value
        .map(|v| percent(v, 1))
        .unwrap_or_else(|| "N/A".to_string());

    let trend = if analysis.gap > 0.0 {
        format!(
            "Os dados disponíveis mostram uma variação média de {} por ano desde {}, mas o indicador ainda está \
             distante da meta estipulada de {} até {}, conforme alinhamento com os objetivos nacionais para o ODS 12.",
            percentage_points(analysis.average_annual_increment, 1),
            analysis.initial_year,
            percent(target.value, 0),
            target.year
        )
    } else {
        format!(
            "Os dados disponíveis mostram que o indicador já alcançou a meta estipulada de {} até {}.",
            percent(target.value, 0),
            target.year
        )
    };

    doc.heading(ENHANCED_SECTION, "2. SITUAÇÃO ATUAL", 1)
        .paragraph(
            ENHANCED_BODY,
            &format!(
                "Atualmente, o percentual de resíduos sólidos urbanos reciclados em {} é de {}, conforme dados \
                 atualizados em {}. Este indicador é considerado central para o monitoramento do progresso do ODS \
                 12 no estado.",
                ctx.dataset.region,
                value,
                ctx.last_updated()
            ),
        )
        .spacer(BLOCK_GAP)
        .paragraph(ENHANCED_BODY, &trend);
    figure(
        doc,
        1,
        charts::history_bars(ctx)?,
        &format!("Evolução histórica do percentual de resíduos reciclados em {}.", ctx.dataset.region),
    );
    Ok(())
}

fn composition(doc: &mut Document, ctx: &ReportContext) -> Result<(), ReportError> {
    let leading = ctx
        .dataset
        .waste_composition
        .iter()
        .sorted_by(|a, b| b.percent.total_cmp(&a.percent))
        .take(2)
        .map(|share| format!("{} ({})", share.label.to_lowercase(), percent(share.percent, 0)))
        .join(" e ");

    doc.heading(ENHANCED_SECTION, "3. DISTRIBUIÇÃO DOS RESÍDUOS RECICLADOS", 1)
        .paragraph(
            ENHANCED_BODY,
            &format!(
                "A análise da composição dos resíduos reciclados revela que {} constituem a maior parte do volume \
                 processado. Contudo, observa-se uma baixa taxa de reciclagem de resíduos orgânicos, que representam \
                 cerca de 50% do total de resíduos gerados no estado.",
                leading
            ),
        );
    figure(
        doc,
        2,
        charts::composition_pie(ctx)?,
        &format!("Distribuição dos tipos de resíduos reciclados em {}.", ctx.dataset.region),
    );
    Ok(())
}

fn municipalities(doc: &mut Document, ctx: &ReportContext) -> Result<(), ReportError> {
    let dataset = ctx.dataset;
    let total: u32 = dataset.municipal_initiatives.iter().map(|m| m.count).sum();
    let leader = dataset.municipal_initiatives.iter().max_by_key(|m| m.count);

    let concentration = match leader {
        Some(leader) if total > 0 => format!(
            "uma concentração significativa em {}, com {} das {} iniciativas mapeadas ({})",
            leader.label,
            leader.count,
            total,
            percent(f64::from(leader.count) / f64::from(total) * 100.0, 1)
        ),
        _ => "uma distribuição ainda incipiente".to_string(),
    };

    doc.heading(ENHANCED_SECTION, "4. INICIATIVAS SUSTENTÁVEIS POR MUNICÍPIO", 1)
        .paragraph(
            ENHANCED_BODY,
            &format!(
                "O mapeamento das iniciativas de consumo e produção sustentável em {} revela {}. É necessário \
                 ampliar estas iniciativas para municípios de menor porte para garantir um desenvolvimento mais \
                 equilibrado em todo o estado.",
                dataset.region, concentration
            ),
        );
    figure(
        doc,
        3,
        charts::municipal_bars(ctx)?,
        &format!("Iniciativas de consumo e produção sustentável por município em {}.", dataset.region),
    );
    Ok(())
}

fn projection(doc: &mut Document, ctx: &ReportContext) -> Result<(), ReportError> {
    let analysis = ctx.analysis;
    let target = analysis.target;
    let outcome = if analysis.on_track() {
        format!(
            "{} alcançará a meta estabelecida, atingindo aproximadamente {} em {}",
            ctx.dataset.region,
            percent(analysis.historical_pace_estimate, 1),
            target.year
        )
    } else {
        format!(
            "{} ficará aquém da meta estabelecida, atingindo aproximadamente {} em {}",
            ctx.dataset.region,
            percent(analysis.historical_pace_estimate, 1),
            target.year
        )
    };

    doc.heading(ENHANCED_SECTION, "5. PROJEÇÃO E METAS", 1)
        .paragraph(
            ENHANCED_BODY,
            &format!(
                "Com base na tendência atual, foi realizada uma projeção para avaliar a possibilidade de atingir a \
                 meta de {} de resíduos reciclados até {}. A análise indica que, mantendo o ritmo médio de \
                 crescimento, {}. Para cumprir a meta, seria necessário um acréscimo de {} ao ano.",
                percent(target.value, 0),
                target.year,
                outcome,
                percentage_points(analysis.required_annual_increment, 2)
            ),
        );
    figure(
        doc,
        4,
        charts::enhanced_projection_line(ctx)?,
        &format!("Projeção do percentual de resíduos reciclados até {}.", target.year),
    );
    Ok(())
}

fn recommendations(doc: &mut Document, ctx: &ReportContext) {
    let dataset = ctx.dataset;

    doc.heading(ENHANCED_SECTION, "6. RECOMENDAÇÕES DE POLÍTICAS PÚBLICAS", 1)
        .paragraph(
            ENHANCED_BODY,
            &format!(
                "Com base na análise técnica realizada e nas boas práticas identificadas, apresentamos as seguintes \
                 recomendações para acelerar o progresso em direção às metas do ODS 12 em {}:",
                dataset.region
            ),
        )
        .bullets(
            ENHANCED_LIST,
            [
                "Desenvolver uma política estadual de economia circular, com incentivos fiscais para empresas que \
                 adotem modelos de negócios circulares, investindo em design de produtos para durabilidade, \
                 reparabilidade e reciclabilidade.",
                "Criar um programa de apoio técnico e financeiro para cooperativas de catadores, visando aumentar a \
                 capacidade de processamento e agregação de valor aos materiais reciclados.",
                "Implementar um sistema de logística reversa efetivo para embalagens, eletrônicos, medicamentos e \
                 outros produtos prioritários, envolvendo produtores, distribuidores, comerciantes e consumidores.",
                "Fortalecer programas educacionais sobre consumo consciente e sustentável nas escolas, universidades \
                 e comunidades, promovendo mudanças de comportamento.",
                "Implementar políticas para reduzir o desperdício de alimentos em toda a cadeia produtiva, desde a \
                 produção agrícola até o consumo final.",
                "Criar um fundo estadual para financiar projetos de inovação em consumo e produção sustentáveis, \
                 priorizando tecnologias de baixo carbono e resíduo zero.",
                "Estabelecer critérios de sustentabilidade para compras públicas, incentivando a demanda por \
                 produtos e serviços ambientalmente responsáveis.",
            ],
        )
        .spacer(SECTION_GAP);

    let table = dataset.priority_actions.iter().fold(
        Table::new(vec![ColumnWidth::Fraction(0.4), ColumnWidth::Fraction(0.3), ColumnWidth::Fraction(0.2)])
            .header(["Ação", "Horizonte", "Impacto Esperado"])
            .styles(ENHANCED_TABLE_HEADER, TABLE_CELL)
            .grid(Stroke::solid(Color::BLACK, 1.0)),
        |table, action| table.row([action.action.as_str(), action.horizon.as_str(), action.impact.as_str()]),
    );
    doc.heading(ENHANCED_SECTION, "7. AÇÕES PRIORITÁRIAS", 1)
        .paragraph(
            ENHANCED_BODY,
            &format!(
                "Para acelerar o progresso do ODS 12 em {}, destacamos as seguintes ações prioritárias para \
                 implementação imediata:",
                dataset.region
            ),
        )
        .table(table)
        .spacer(SECTION_GAP);
}

fn conclusion(doc: &mut Document, ctx: &ReportContext) {
    let analysis = ctx.analysis;
    let target = analysis.target;
    let pace = if analysis.on_track() {
        "O ritmo atual de progresso é compatível com as metas estabelecidas, o que demanda a manutenção dos \
         esforços e a consolidação das políticas em curso."
    } else {
        "O ritmo atual de progresso é insuficiente para alcançar as metas estabelecidas, o que demanda uma \
         intensificação dos esforços e a adoção de políticas mais ambiciosas."
    };

    doc.heading(ENHANCED_SECTION, "8. CONCLUSÃO", 1)
        .paragraph(
            ENHANCED_BODY,
            &format!(
                "A análise técnica do ODS 12 em {} revela avanços na implementação de práticas de consumo e \
                 produção sustentáveis, mas também mostra desafios importantes a serem superados. {}",
                ctx.dataset.region, pace
            ),
        )
        .spacer(BLOCK_GAP)
        .paragraph(
            ENHANCED_BODY,
            &format!(
                "Com a implementação das recomendações e ações prioritárias propostas neste relatório, estima-se que \
                 {} possa aproximar seu percentual de reciclagem de {} até {}, além de promover avanços \
                 significativos em outras dimensões do consumo e produção responsáveis.",
                ctx.dataset.region,
                percent(target.value, 0),
                target.year
            ),
        )
        .spacer(BLOCK_GAP)
        .paragraph(
            ENHANCED_BODY,
            "É fundamental o engajamento de todos os setores da sociedade (governo, empresas, instituições de \
             ensino e pesquisa, organizações da sociedade civil e cidadãos) para que as transformações necessárias \
             ganhem escala e se tornem permanentes, contribuindo para um futuro mais sustentável para toda a \
             população.",
        );
}
